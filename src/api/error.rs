use crate::application::catalog::CatalogError;
use crate::domain::book::Violation;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーとバウンダリでの検証失敗をラップし、
/// HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    /// 書き込みリクエストのフィールド検証違反。全違反をまとめて返す
    Validation(Vec<Violation>),
    /// ドメインサービスが返した典型的な失敗
    Catalog(CatalogError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // 422 Unprocessable Entity - 検証違反は全メッセージを返す
            ApiError::Validation(violations) => {
                let details = violations
                    .iter()
                    .map(|v| v.message.to_string())
                    .collect();
                let body = Json(ErrorResponse::with_details(
                    "The book payload is invalid.",
                    details,
                ));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }

            ApiError::Catalog(err) => {
                let (status, message) = match &err {
                    // 404 Not Found - 該当ISBNの書籍が存在しない
                    CatalogError::BookNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),

                    // 409 Conflict - ISBN重複、または楽観ロック競合
                    CatalogError::BookAlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
                    CatalogError::EditConflict(_) => (StatusCode::CONFLICT, err.to_string()),

                    // 500 Internal Server Error - ストア障害
                    // 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                    CatalogError::RepositoryError(e) => {
                        tracing::error!("Repository error: {}", e);
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "An unexpected error occurred".to_string(),
                        )
                    }
                };

                (status, Json(ErrorResponse::new(message))).into_response()
            }
        }
    }
}
