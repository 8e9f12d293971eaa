use crate::domain::book::Book;
use async_trait::async_trait;
use thiserror::Error;

/// リポジトリ層のエラー
///
/// ドメインサービスが意味を持って扱う失敗（ISBN一意制約違反と
/// 楽観ロック競合）だけを型で区別し、それ以外のストア障害は
/// 不透明なまま伝搬する。
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// ISBN一意制約違反（挿入時にストアが検出）
    #[error("a book with ISBN {0} is already stored")]
    DuplicateIsbn(String),

    /// 楽観ロック競合（読み取り時のversionが書き込み時に古くなっていた）
    #[error("stale version {version} for book with ISBN {isbn}")]
    VersionConflict { isbn: String, version: i32 },

    /// その他のストア障害
    #[error("storage failure")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// 書籍リポジトリポート
///
/// Book永続化の抽象。ドメインサービスはこのポートだけに依存し、
/// 具体的なストア（PostgreSQL / インメモリ）はアダプターが提供する。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 全書籍を返す。順序はストア定義（契約上の保証なし）
    async fn find_all(&self) -> Result<Vec<Book>>;

    /// ISBN完全一致で検索する
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>>;

    /// ISBNの存在チェック
    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool>;

    /// 保存する。idなしなら挿入（id発番・version 0）、idありなら
    /// version一致を条件とした更新（versionインクリメント）。
    /// 戻り値はストアが確定させた行
    async fn save(&self, book: Book) -> Result<Book>;

    /// ISBNで削除する。存在しなければ何もしない（冪等）
    async fn delete_by_isbn(&self, isbn: &str) -> Result<()>;
}
