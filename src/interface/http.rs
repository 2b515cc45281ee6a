//! HTTP interface for bookstore-api
//!
//! axum router <-> application::BookService
//!
//! 7 routes: list, get, create, replace, patch, delete one, delete all.
//! ここは薄い配線に徹する。判断ロジックはすべてdomain/applicationにあり、
//! この層はパース済みペイロードの受け渡しと outcome -> status code の
//! 変換だけを行う。

use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::application::error::AppError;
use crate::application::service::BookService;
use crate::domain::error::DomainError;
use crate::domain::model::book::Book;
use crate::domain::model::id::BookId;
use crate::domain::patch::PatchOp;

// =============================================================================
// Public entry point
// =============================================================================

/// HTTPサーバを起動する。
pub async fn run(addr: SocketAddr, service: BookService) -> anyhow::Result<()> {
    let app = build_router(service);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("bookstore-api listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// 全ルートを配線したRouterを返す（テストからも使う）。
pub fn build_router(service: BookService) -> Router {
    Router::new()
        .route(
            "/api/books",
            get(list_all).post(create_one).delete(delete_all),
        )
        .route(
            "/api/books/:id",
            get(get_one)
                .put(replace_one)
                .patch(patch_one)
                .delete(delete_one),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_all(State(svc): State<BookService>) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(svc.list_all()?))
}

async fn get_one(
    State(svc): State<BookService>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(svc.get_by_id(BookId::new(id))?))
}

async fn create_one(
    State(svc): State<BookService>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(book) = payload.map_err(reject_payload)?;
    let created = svc.create(book)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn replace_one(
    State(svc): State<BookService>,
    Path(id): Path<i64>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let Json(book) = payload.map_err(reject_payload)?;
    Ok(Json(svc.replace(BookId::new(id), book)?))
}

async fn patch_one(
    State(svc): State<BookService>,
    Path(id): Path<i64>,
    payload: Result<Json<Vec<PatchOp>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(ops) = payload.map_err(reject_payload)?;
    svc.patch_one(BookId::new(id), &ops)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DeleteOneの404だけは `{statusCode, message}` ボディ付きで返すワイヤ契約。
async fn delete_one(State(svc): State<BookService>, Path(id): Path<i64>) -> Response {
    match svc.delete_one(BookId::new(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(AppError::Domain(err @ DomainError::BookNotFound(_))) => (
            StatusCode::NOT_FOUND,
            Json(json!({"statusCode": 404, "message": err.to_string()})),
        )
            .into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

async fn delete_all(State(svc): State<BookService>) -> Result<StatusCode, ApiError> {
    svc.delete_all()?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Error mapping
// =============================================================================

/// ボディのパース失敗は握りつぶさず、元のエラーをログしてから400に変換する。
fn reject_payload(rejection: JsonRejection) -> ApiError {
    tracing::warn!(error = %rejection, "rejecting malformed request payload");
    ApiError(AppError::InvalidPayload)
}

struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::Domain(DomainError::BookNotFound(_)) => {
                StatusCode::NOT_FOUND.into_response()
            }
            // IdMismatch ("Parameters do not match") / patch失敗はいずれも400、
            // Displayをそのままボディに載せる
            AppError::Domain(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
            AppError::InvalidPayload => StatusCode::BAD_REQUEST.into_response(),
            AppError::LockPoisoned => {
                tracing::error!("book store lock poisoned");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
