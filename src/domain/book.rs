use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 書籍ID - カタログ集約のサロゲートキー
///
/// ストア側（アダプター）が初回永続化時に発番する。呼び出し側にとっては
/// 不透明な識別子であり、ビジネスキーはあくまでISBN。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

/// Book集約 - カタログ唯一のエンティティ
///
/// 不変条件:
/// - ISBNはカタログ全体で一意（ストアの一意制約が最終防衛線）
/// - ISBNは作成後に変更されない（編集は内容フィールドのみ差し替える）
/// - id/versionはストア管理。versionは更新のたびにストアがインクリメントし、
///   楽観ロックの競合検出に使われる
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// サロゲートID。初回永続化前はNone
    pub id: Option<BookId>,
    /// 楽観ロック用バージョン
    pub version: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl Book {
    /// 未永続化のBookを組み立てる（idなし、version 0）
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: None,
            version: 0,
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            price,
        }
    }

    /// ストア由来の識別子付きでBookを復元する（行→エンティティ変換用）
    pub fn with_identity(
        id: BookId,
        version: i32,
        isbn: String,
        title: String,
        author: String,
        price: f64,
    ) -> Self {
        Self {
            id: Some(id),
            version,
            isbn,
            title,
            author,
            price,
        }
    }
}

// ============================================================================
// フィールド検証
// ============================================================================

pub const MSG_ISBN_REQUIRED: &str = "The book ISBN must be defined.";
pub const MSG_ISBN_FORMAT: &str = "The ISBN format must be valid: a 10 or 13 digit number.";
pub const MSG_TITLE_REQUIRED: &str = "The book title must be defined.";
pub const MSG_AUTHOR_REQUIRED: &str = "The book author must be defined.";
pub const MSG_PRICE_REQUIRED: &str = "The book price must be defined.";
pub const MSG_PRICE_POSITIVE: &str = "The book price must be greater than zero.";

/// フィールド検証の違反
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

/// 未検証の書き込み入力
///
/// 全フィールドをOptionで受け、検証を通過してはじめてBookになる。
/// id/versionは意図的に持たない（識別子はストア管理、呼び出し側から
/// 注入させない）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookDraft {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<f64>,
}

type Rule = (&'static str, &'static str, fn(&BookDraft) -> bool);

/// 検証ルール表。各ルールは独立に評価され、違反はすべて収集される
/// （最初の違反で打ち切らない）。
///
/// 形式ルールは値が存在するときだけ評価する。そのためISBNが未指定なら
/// 違反は非空ルールの1件だけ、空文字列なら非空・形式の2件になる。
const RULES: [Rule; 6] = [
    ("isbn", MSG_ISBN_REQUIRED, |d| is_blank(&d.isbn)),
    ("isbn", MSG_ISBN_FORMAT, |d| {
        d.isbn.as_deref().is_some_and(|s| !is_valid_isbn(s))
    }),
    ("title", MSG_TITLE_REQUIRED, |d| is_blank(&d.title)),
    ("author", MSG_AUTHOR_REQUIRED, |d| is_blank(&d.author)),
    ("price", MSG_PRICE_REQUIRED, |d| d.price.is_none()),
    ("price", MSG_PRICE_POSITIVE, |d| {
        d.price.is_some_and(|p| p <= 0.0)
    }),
];

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// ISBNは10桁または13桁の数字のみ
fn is_valid_isbn(isbn: &str) -> bool {
    (isbn.len() == 10 || isbn.len() == 13) && isbn.bytes().all(|b| b.is_ascii_digit())
}

impl BookDraft {
    /// 全ルールを評価し、違反の集合を返す。空なら永続化可能
    pub fn validate(&self) -> Vec<Violation> {
        RULES
            .iter()
            .filter(|(_, _, broken)| broken(self))
            .map(|&(field, message, _)| Violation { field, message })
            .collect()
    }

    /// 検証を通過した場合のみBookへ変換する
    pub fn try_into_book(self) -> Result<Book, Vec<Violation>> {
        let violations = self.validate();
        match (violations.is_empty(), self.isbn, self.title, self.author, self.price) {
            (true, Some(isbn), Some(title), Some(author), Some(price)) => {
                Ok(Book::new(isbn, title, author, price))
            }
            _ => Err(violations),
        }
    }
}
