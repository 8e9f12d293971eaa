use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::book::{Book, BookDraft};

/// 書籍の書き込みリクエスト（POST /books と PUT /books/:isbn）
///
/// 全フィールドをOptionで受け、検証は境界（ハンドラー）で行う。
/// id/versionは受け取らない。識別子はストア管理であり、クライアントが
/// 注入できてはならない。
#[derive(Debug, Clone, Deserialize)]
pub struct BookRequest {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<f64>,
}

impl BookRequest {
    /// ドメインの未検証ドラフトへ変換する
    pub fn into_draft(self) -> BookDraft {
        BookDraft {
            isbn: self.isbn,
            title: self.title,
            author: self.author,
            price: self.price,
        }
    }
}

/// 書籍レスポンス
///
/// ストアが確定させたid/versionを含む完全な表現。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: Option<Uuid>,
    pub version: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.map(|id| id.value()),
            version: book.version,
            isbn: book.isbn,
            title: book.title,
            author: book.author,
            price: book.price,
        }
    }
}

/// エラーレスポンス
///
/// 検証エラーのときだけdetailsに全違反メッセージが入る。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            details: None,
        }
    }

    pub fn with_details(message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            error: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::BookId;

    // ワイヤフォーマットのラウンドトリップ検証
    #[test]
    fn test_book_response_json_round_trip() {
        let book = Book::with_identity(
            BookId::new(),
            3,
            "1234567890".to_string(),
            "Northern Lights".to_string(),
            "Lyra Silverstar".to_string(),
            9.9,
        );
        let response = BookResponse::from(book);

        let json = serde_json::to_string(&response).unwrap();
        let parsed: BookResponse = serde_json::from_str(&json).unwrap();

        // 全フィールドが元と等しいこと
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_book_entity_json_round_trip() {
        let book = Book::new("9781234567890", "Polar Journey", "Iorek Polarson", 12.90);

        let json = serde_json::to_value(&book).unwrap();
        let parsed: Book = serde_json::from_value(json).unwrap();

        assert_eq!(parsed, book);
    }

    #[test]
    fn test_book_request_accepts_partial_payload() {
        // 欠けたフィールドはNoneで受ける（検証は境界で行う）
        let request: BookRequest =
            serde_json::from_str(r#"{"title": "Title", "price": 9.9}"#).unwrap();
        let draft = request.into_draft();

        assert!(draft.isbn.is_none());
        assert!(draft.author.is_none());
        assert_eq!(draft.title.as_deref(), Some("Title"));
        assert_eq!(draft.price, Some(9.9));
    }

    #[test]
    fn test_error_response_omits_absent_details() {
        let json = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert!(json.get("details").is_none());
    }
}
