//! Shared test harness for integration tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use bookstore_api::application::service::BookService;
use bookstore_api::domain::model::book::Book;
use bookstore_api::domain::model::id::BookId;
use bookstore_api::domain::model::store::BookStore;
use bookstore_api::domain::patch::PatchOp;
use bookstore_api::interface::http::build_router;

// =============================================================================
// Service-level helpers
// =============================================================================

/// 起動時サンプルセット入りのService。
pub fn seeded_service() -> BookService {
    BookService::new(BookStore::seeded())
}

pub fn empty_service() -> BookService {
    BookService::new(BookStore::new())
}

pub fn book(id: i64, title: &str, price: f64) -> Book {
    Book::new(id, title, price)
}

pub fn id(n: i64) -> BookId {
    BookId::new(n)
}

/// JSONリテラルからpatchドキュメントを組み立てる。
pub fn patch_doc(doc: serde_json::Value) -> Vec<PatchOp> {
    serde_json::from_value(doc).unwrap()
}

// =============================================================================
// HTTP-level helpers (tower oneshot)
// =============================================================================

/// サンプルセット入りStoreを配線したRouter。
pub fn app() -> Router {
    build_router(seeded_service())
}

/// 1リクエストを送ってステータスとボディを返す。Routerはcloneして使うので
/// 同じappに対する連続呼び出しは同じStoreを共有する。
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, Bytes) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes)
}

/// ボディをJSONとして読む。
pub fn json_body(bytes: &Bytes) -> serde_json::Value {
    serde_json::from_slice(bytes).unwrap()
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
