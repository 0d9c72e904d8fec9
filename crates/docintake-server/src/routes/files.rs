use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use docintake_store::{content_type_for_key, StoreError};

use super::{error_response, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/files/{*key}", get(get_file))
}

/// Serve a stored document. Stores with their own public URL get a redirect.
async fn get_file(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    if let Some(url) = state.store.public_url(&key) {
        return Redirect::temporary(&url).into_response();
    }

    match state.store.get(&key).await {
        Ok(data) => (
            [(header::CONTENT_TYPE, content_type_for_key(&key))],
            data,
        )
            .into_response(),
        Err(StoreError::NotFound(k)) => {
            error_response(StatusCode::NOT_FOUND, format!("file not found: {k}")).into_response()
        }
        Err(StoreError::InvalidKey(msg)) => {
            error_response(StatusCode::BAD_REQUEST, msg).into_response()
        }
        Err(e) => {
            tracing::error!(key = %key, "file read failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::test_helpers::{multipart_body, test_router, MultipartPart, BOUNDARY};

    #[tokio::test]
    async fn uploaded_file_is_served_back() {
        let app = test_router().await;
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/upload")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(multipart_body(&[
                        MultipartPart::file("file", "list.pdf", "application/pdf", b"%PDF-1.4"),
                        MultipartPart::text("folder", "packingList"),
                        MultipartPart::text("companyName", "Acme"),
                    ])))
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        let path = v["path"].as_str().unwrap();

        let resp = app
            .oneshot(
                Request::builder()
                    .uri(format!("/files/{path}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let app = test_router().await;
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/files/msds/nothing_here_1.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dot_segments_are_rejected() {
        let app = test_router().await;
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/files/msds/%2E%2E/secret.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
