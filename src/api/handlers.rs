use crate::application::catalog::{self, ServiceDependencies};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{BookRequest, BookResponse},
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /books - カタログの全書籍を取得
pub async fn get_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = catalog::get_books(&state.service_deps).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// GET /books/:isbn - ISBN完全一致で1冊取得
///
/// 見つからない場合は404を返す。
pub async fn get_book_by_isbn(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = catalog::get_book(&state.service_deps, &isbn).await?;
    Ok(Json(book.into()))
}

// ============================================================================
// Command handlers (POST / PUT / DELETE)
// ============================================================================

/// POST /books - 書籍をカタログへ登録
///
/// 検証はドメインサービスを呼ぶ前にこの境界で行い、違反は422で
/// 全件返す。ISBN重複は409。
pub async fn post_book(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = request
        .into_draft()
        .try_into_book()
        .map_err(ApiError::Validation)?;

    let created = catalog::add_book_to_catalog(&state.service_deps, book).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// PUT /books/:isbn - 書籍を編集（存在しなければ新規登録）
///
/// 既存書籍のISBNは維持され、パッチのtitle/author/priceだけが
/// 反映される。パスのISBNが存在しない場合はペイロード自身のISBNで
/// 登録される。
pub async fn put_book(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
    Json(request): Json<BookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let patch = request
        .into_draft()
        .try_into_book()
        .map_err(ApiError::Validation)?;

    let saved = catalog::edit_book(&state.service_deps, &isbn, patch).await?;

    Ok(Json(saved.into()))
}

/// DELETE /books/:isbn - 書籍を削除
///
/// 存在しないISBNでも常に204（冪等）。
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_book_from_catalog(&state.service_deps, &isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}
