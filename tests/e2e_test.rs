use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog_service::adapters::mock::BookRepository as InMemoryBookRepository;
use catalog_service::api::handlers::AppState;
use catalog_service::api::router::create_router;
use catalog_service::api::types::{BookResponse, ErrorResponse};
use catalog_service::application::catalog::ServiceDependencies;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// E2Eテスト用のアプリケーションセットアップ
///
/// 実際のAPIルーターとインメモリリポジトリを使用する。リポジトリは
/// PostgreSQL実装と同じ保存契約（id発番・version更新・一意制約）を
/// 再現するため、HTTP境界の振る舞いをデータベースなしで検証できる。
fn setup_app() -> axum::Router {
    let service_deps = ServiceDependencies {
        book_repository: Arc::new(InMemoryBookRepository::new()),
    };
    let app_state = Arc::new(AppState { service_deps });
    create_router(app_state)
}

async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn send(app: &axum::Router, method: &str, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn read_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn book_payload(isbn: &str, title: &str, author: &str, price: f64) -> serde_json::Value {
    json!({
        "isbn": isbn,
        "title": title,
        "author": author,
        "price": price,
    })
}

// ============================================================================
// E2Eテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_e2e_full_crud_flow() {
    let app = setup_app();

    // Step 1: 登録（POST /books）
    let response = send_json(
        &app,
        "POST",
        "/books",
        book_payload("1234567890", "Northern Lights", "Lyra Silverstar", 9.9),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: BookResponse = read_body(response).await;
    assert_eq!(created.isbn, "1234567890");
    assert!(created.id.is_some());
    assert_eq!(created.version, 0);

    // Step 2: 一覧取得（GET /books）
    let response = send(&app, "GET", "/books").await;
    assert_eq!(response.status(), StatusCode::OK);
    let books: Vec<BookResponse> = read_body(response).await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].isbn, "1234567890");

    // Step 3: 1冊取得（GET /books/:isbn）
    let response = send(&app, "GET", "/books/1234567890").await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: BookResponse = read_body(response).await;
    assert_eq!(fetched, created);

    // Step 4: 編集（PUT /books/:isbn）
    let response = send_json(
        &app,
        "PUT",
        "/books/1234567890",
        book_payload("1234567890", "Northern Lights and Stars", "Lyra Silverstar", 10.9),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: BookResponse = read_body(response).await;
    assert_eq!(updated.isbn, "1234567890");
    assert_eq!(updated.title, "Northern Lights and Stars");
    assert_eq!(updated.price, 10.9);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.version, 1);

    // Step 5: 削除（DELETE /books/:isbn）
    let response = send(&app, "DELETE", "/books/1234567890").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Step 6: 削除後の取得は404
    let response = send(&app, "GET", "/books/1234567890").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = read_body(response).await;
    assert_eq!(error.error, "The book with ISBN 1234567890 was not found.");

    // Step 7: 削除は冪等（2回目も204）
    let response = send(&app, "DELETE", "/books/1234567890").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_e2e_health_check() {
    let app = setup_app();

    let response = send(&app, "GET", "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

// ============================================================================
// E2Eテスト: 異常系
// ============================================================================

#[tokio::test]
async fn test_e2e_post_with_invalid_payload_returns_all_violations() {
    let app = setup_app();

    // 空ISBN（2違反）+ 空title（1違反）で計3件
    let response = send_json(
        &app,
        "POST",
        "/books",
        json!({"isbn": "", "title": "", "author": "Author", "price": 9.9}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = read_body(response).await;
    let details = error.details.unwrap();
    assert_eq!(details.len(), 3);
    assert!(details.contains(&"The book ISBN must be defined.".to_string()));
    assert!(
        details.contains(&"The ISBN format must be valid: a 10 or 13 digit number.".to_string())
    );
    assert!(details.contains(&"The book title must be defined.".to_string()));
}

#[tokio::test]
async fn test_e2e_post_duplicate_isbn_returns_conflict() {
    let app = setup_app();
    let payload = book_payload("1234567890", "Northern Lights", "Lyra Silverstar", 9.9);

    let response = send_json(&app, "POST", "/books", payload.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send_json(&app, "POST", "/books", payload).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: ErrorResponse = read_body(response).await;
    assert_eq!(error.error, "A book with ISBN 1234567890 already exists.");
}

#[tokio::test]
async fn test_e2e_get_unknown_isbn_returns_not_found() {
    let app = setup_app();

    let response = send(&app, "GET", "/books/0000000000").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = read_body(response).await;
    assert_eq!(error.error, "The book with ISBN 0000000000 was not found.");
}

// ============================================================================
// E2Eテスト: PUTのupsertセマンティクス
// ============================================================================

#[tokio::test]
async fn test_e2e_put_existing_isbn_ignores_payload_isbn() {
    let app = setup_app();
    send_json(
        &app,
        "POST",
        "/books",
        book_payload("1234567890", "Northern Lights", "Lyra Silverstar", 9.9),
    )
    .await;

    // ペイロードは別ISBNを運ぶが、パスのISBNの書籍が内容だけ更新される
    let response = send_json(
        &app,
        "PUT",
        "/books/1234567890",
        book_payload("9999999999", "New Title", "A", 5.0),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated: BookResponse = read_body(response).await;
    assert_eq!(updated.isbn, "1234567890");
    assert_eq!(updated.title, "New Title");

    // ペイロード側のISBNでは何も作られていない
    let response = send(&app, "GET", "/books/9999999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_e2e_put_unknown_isbn_creates_under_payload_isbn() {
    let app = setup_app();

    // パスのISBNに書籍が無い場合、ペイロード自身のISBNで作成される
    let response = send_json(
        &app,
        "PUT",
        "/books/0000000000",
        book_payload("5555555555", "Fresh Title", "Fresh Author", 7.5),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let created: BookResponse = read_body(response).await;
    assert_eq!(created.isbn, "5555555555");

    let response = send(&app, "GET", "/books/5555555555").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/books/0000000000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_e2e_put_with_invalid_payload_returns_violations() {
    let app = setup_app();

    let response = send_json(
        &app,
        "PUT",
        "/books/1234567890",
        json!({"isbn": "1234567890", "title": "Title", "author": "Author", "price": -1.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = read_body(response).await;
    let details = error.details.unwrap();
    assert_eq!(
        details,
        vec!["The book price must be greater than zero.".to_string()]
    );
}
