use crate::domain::book::Book;
use crate::ports::book_repository::{BookRepository, RepositoryError};
use std::sync::Arc;

use super::errors::{CatalogError, Result};

/// サービスの依存関係
///
/// 依存はコンストラクタ注入ではなくデータ構造として明示し、
/// 振る舞いは純粋な関数に渡す。テスト時はモックリポジトリを
/// 差し込むだけでよい。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_repository: Arc<dyn BookRepository>,
}

/// 保存後にISBNで取り直すヘルパー関数
///
/// add/editの戻り値は常にストアを再読してから返す。これにより
/// 呼び出し側はストアが確定させたid/versionを必ず観測できる。
async fn refetch_by_isbn(deps: &ServiceDependencies, isbn: &str) -> Result<Book> {
    deps.book_repository
        .find_by_isbn(isbn)
        .await
        .map_err(CatalogError::RepositoryError)?
        .ok_or_else(|| CatalogError::BookNotFound(isbn.to_string()))
}

/// カタログの全書籍を返す
///
/// 順序はストア定義のまま。契約として順序は保証しない。
pub async fn get_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    deps.book_repository
        .find_all()
        .await
        .map_err(CatalogError::RepositoryError)
}

/// ISBN完全一致で1冊取得する
///
/// 存在しなければBookNotFound。
pub async fn get_book(deps: &ServiceDependencies, isbn: &str) -> Result<Book> {
    deps.book_repository
        .find_by_isbn(isbn)
        .await
        .map_err(CatalogError::RepositoryError)?
        .ok_or_else(|| CatalogError::BookNotFound(isbn.to_string()))
}

/// 書籍をカタログへ登録する
///
/// ビジネスルール: ISBNはカタログ全体で一意。
///
/// 事前の存在チェックは早期リターンのためのもので、チェックと保存の
/// 間のレースはストアの一意制約が塞ぐ。制約違反はDuplicateIsbnとして
/// 返ってくるので、どちらの経路でもBookAlreadyExistsに正規化する。
pub async fn add_book_to_catalog(deps: &ServiceDependencies, book: Book) -> Result<Book> {
    let isbn = book.isbn.clone();

    // 1. 一意性の事前チェック
    let exists = deps
        .book_repository
        .exists_by_isbn(&isbn)
        .await
        .map_err(CatalogError::RepositoryError)?;

    if exists {
        return Err(CatalogError::BookAlreadyExists(isbn));
    }

    // 2. 保存。チェック後に割り込まれた場合は一意制約が検出する
    match deps.book_repository.save(book).await {
        Ok(_) => {}
        Err(RepositoryError::DuplicateIsbn(_)) => {
            return Err(CatalogError::BookAlreadyExists(isbn));
        }
        Err(e) => return Err(CatalogError::RepositoryError(e)),
    }

    // 3. ISBNで取り直し、ストアが発番したid/versionを返す
    refetch_by_isbn(deps, &isbn).await
}

/// 書籍をカタログから削除する
///
/// 存在しないISBNに対しても成功する（冪等なno-op）。
pub async fn delete_book_from_catalog(deps: &ServiceDependencies, isbn: &str) -> Result<()> {
    deps.book_repository
        .delete_by_isbn(isbn)
        .await
        .map_err(CatalogError::RepositoryError)
}

/// 書籍を編集する（編集 or 新規登録）
///
/// パスのISBNに書籍が存在する場合: 格納済みの識別子（isbn/id/version）を
/// 維持したまま、title/author/priceだけをパッチの値で差し替えて保存する。
/// パッチが別のISBNを運んでいても無視される（ISBNは作成後不変）。
///
/// 存在しない場合: パッチ自身のISBNでの新規登録として扱う。つまり
/// 存在しないISBNへのPUTは、パス側ではなくペイロード側のISBNで
/// 書籍を作る。
pub async fn edit_book(deps: &ServiceDependencies, isbn: &str, patch: Book) -> Result<Book> {
    let existing = deps
        .book_repository
        .find_by_isbn(isbn)
        .await
        .map_err(CatalogError::RepositoryError)?;

    let Some(existing) = existing else {
        return add_book_to_catalog(deps, patch).await;
    };

    let replacement = Book {
        id: existing.id,
        version: existing.version,
        isbn: existing.isbn,
        title: patch.title,
        author: patch.author,
        price: patch.price,
    };

    match deps.book_repository.save(replacement).await {
        Ok(_) => refetch_by_isbn(deps, isbn).await,
        Err(RepositoryError::VersionConflict { .. }) => {
            Err(CatalogError::EditConflict(isbn.to_string()))
        }
        Err(e) => Err(CatalogError::RepositoryError(e)),
    }
}
