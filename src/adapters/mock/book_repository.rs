use crate::domain::book::{Book, BookId};
use crate::ports::book_repository::{
    BookRepository as BookRepositoryTrait, RepositoryError, Result,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// BookRepositoryのインメモリ実装
///
/// ISBNをキーにしたHashMapで書籍を保持する。id発番・version更新・
/// ISBN一意制約・楽観ロック競合の検出など、PostgreSQL実装と同じ
/// 契約を守るため、サービステストとE2Eテストをデータベースなしで
/// 実行できる。
pub struct BookRepository {
    books: Mutex<HashMap<String, Book>>,
}

impl BookRepository {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for BookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn find_all(&self) -> Result<Vec<Book>> {
        let books = self.books.lock().unwrap();
        Ok(books.values().cloned().collect())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let books = self.books.lock().unwrap();
        Ok(books.get(isbn).cloned())
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        let books = self.books.lock().unwrap();
        Ok(books.contains_key(isbn))
    }

    /// PostgreSQL実装と同じ保存契約を再現する
    ///
    /// idなしは挿入（一意制約チェック → id発番 → version 0）、
    /// idありはversion一致を条件とした更新（versionインクリメント）。
    async fn save(&self, book: Book) -> Result<Book> {
        let mut books = self.books.lock().unwrap();

        match book.id {
            None => {
                if books.contains_key(&book.isbn) {
                    return Err(RepositoryError::DuplicateIsbn(book.isbn));
                }
                let stored = Book {
                    id: Some(BookId::new()),
                    version: 0,
                    ..book
                };
                books.insert(stored.isbn.clone(), stored.clone());
                Ok(stored)
            }
            Some(id) => {
                let current = books.values_mut().find(|b| b.id == Some(id));
                match current {
                    Some(current) if current.version == book.version => {
                        // PostgreSQL実装のUPDATEと同様、isbnは書き換えない
                        let stored = Book {
                            isbn: current.isbn.clone(),
                            version: current.version + 1,
                            ..book
                        };
                        *current = stored.clone();
                        Ok(stored)
                    }
                    Some(_) => Err(RepositoryError::VersionConflict {
                        isbn: book.isbn,
                        version: book.version,
                    }),
                    None => Err(RepositoryError::Store(
                        format!("unknown book id {}", id.value()).into(),
                    )),
                }
            }
        }
    }

    async fn delete_by_isbn(&self, isbn: &str) -> Result<()> {
        let mut books = self.books.lock().unwrap();
        books.remove(isbn);
        Ok(())
    }
}
