use crate::ports::book_repository::RepositoryError;
use thiserror::Error;

/// カタログアプリケーション層のエラー
///
/// ドメインレベルの失敗はNotFound/AlreadyExists/競合の3種のみ。
/// ストア障害は変換せず不透明なまま上位（API層）へ伝搬する。
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 指定されたISBNの書籍が存在しない
    #[error("The book with ISBN {0} was not found.")]
    BookNotFound(String),

    /// 同じISBNの書籍が既に登録されている
    #[error("A book with ISBN {0} already exists.")]
    BookAlreadyExists(String),

    /// 楽観ロック競合（別リクエストが先に同じ書籍を更新した）
    #[error("The book with ISBN {0} was updated concurrently.")]
    EditConflict(String),

    /// ストア障害
    #[error("Repository error")]
    RepositoryError(#[source] RepositoryError),
}

/// アプリケーション層のResult型
pub type Result<T> = std::result::Result<T, CatalogError>;
