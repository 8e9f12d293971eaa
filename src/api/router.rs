use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, delete_book, get_book_by_isbn, get_books, post_book, put_book};

/// Creates the API router with all catalog endpoints
///
/// - GET    /books       - list all books
/// - GET    /books/:isbn - get a single book by ISBN
/// - POST   /books       - add a book to the catalog
/// - PUT    /books/:isbn - edit a book (or create it when absent)
/// - DELETE /books/:isbn - remove a book (idempotent)
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Catalog endpoints
        .route("/books", get(get_books).post(post_book))
        .route(
            "/books/:isbn",
            get(get_book_by_isbn).put(put_book).delete(delete_book),
        )
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
