pub mod files;
pub mod health;
pub mod pages;
pub mod submissions;
pub mod upload;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{Json, Router};
use docintake_service::{LocalService, ServiceError};
use docintake_store::ObjectStore;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

pub struct InnerAppState {
    pub service: LocalService,
    pub store: Arc<dyn ObjectStore>,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(service: LocalService, max_upload_bytes: usize) -> Router {
    let state = Arc::new(InnerAppState {
        store: service.store().clone(),
        service,
    });

    Router::new()
        .merge(health::routes())
        .merge(upload::routes())
        .merge(submissions::routes())
        .merge(files::routes())
        .merge(pages::routes())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub(crate) type ApiError = (StatusCode, Json<Value>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

pub(crate) fn to_error(e: ServiceError) -> ApiError {
    match e {
        ServiceError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, msg),
        ServiceError::InvalidInput(msg) => error_response(StatusCode::BAD_REQUEST, msg),
        ServiceError::Internal(msg) => {
            tracing::error!("request failed: {msg}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, msg)
        }
    }
}
