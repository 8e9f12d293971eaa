use crate::domain::book::{Book, BookId};
use crate::ports::book_repository::{
    BookRepository as BookRepositoryTrait, RepositoryError, Result,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQL implementation of the BookRepository port
///
/// A single `books` table keyed by a surrogate UUID, with a unique
/// constraint on `isbn`. The constraint is the authoritative guard against
/// duplicate ISBNs; the service-level existence check is only a fast path.
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// Create a new BookRepository with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row_to_book(row: &PgRow) -> Book {
    Book::with_identity(
        BookId::from_uuid(row.get("id")),
        row.get("version"),
        row.get("isbn"),
        row.get("title"),
        row.get("author"),
        row.get("price"),
    )
}

fn store_error(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Store(Box::new(err))
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn find_all(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, version, isbn, title, author, price
            FROM books
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.iter().map(map_row_to_book).collect())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, version, isbn, title, author, price
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)
            "#,
        )
        .bind(isbn)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)
    }

    /// Persist a book
    ///
    /// A book without an id is inserted: the adapter assigns the surrogate
    /// UUID and version 0, and a unique-constraint violation on `isbn` is
    /// translated to `DuplicateIsbn`. A book with an id is updated under an
    /// optimistic-concurrency guard: the UPDATE only matches the version the
    /// caller read, so zero affected rows means another writer got there
    /// first and the stale write is rejected instead of overwriting.
    async fn save(&self, book: Book) -> Result<Book> {
        match book.id {
            None => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO books (id, version, isbn, title, author, price)
                    VALUES ($1, 0, $2, $3, $4, $5)
                    RETURNING id, version, isbn, title, author, price
                    "#,
                )
                .bind(BookId::new().value())
                .bind(&book.isbn)
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.price)
                .fetch_one(&self.pool)
                .await
                .map_err(|err| match &err {
                    sqlx::Error::Database(db) if db.is_unique_violation() => {
                        RepositoryError::DuplicateIsbn(book.isbn.clone())
                    }
                    _ => store_error(err),
                })?;

                Ok(map_row_to_book(&row))
            }
            Some(id) => {
                let row = sqlx::query(
                    r#"
                    UPDATE books
                    SET title = $1, author = $2, price = $3, version = version + 1
                    WHERE id = $4 AND version = $5
                    RETURNING id, version, isbn, title, author, price
                    "#,
                )
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.price)
                .bind(id.value())
                .bind(book.version)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;

                row.as_ref()
                    .map(map_row_to_book)
                    .ok_or(RepositoryError::VersionConflict {
                        isbn: book.isbn,
                        version: book.version,
                    })
            }
        }
    }

    async fn delete_by_isbn(&self, isbn: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }
}
