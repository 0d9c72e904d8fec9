use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use docintake_core::upload::{UploadedDocument, FIELD_COMPANY_NAME, FIELD_FILE, FIELD_FOLDER};
use docintake_service::proxy::UploadRequest;
use docintake_service::{DocumentFile, IntakeService};

use super::{error_response, to_error, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/upload", post(upload))
}

/// Single-file upload: `file`, `folder` and `companyName` multipart fields.
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadedDocument>, ApiError> {
    let mut multipart =
        multipart.map_err(|e| error_response(StatusCode::BAD_REQUEST, e.body_text()))?;

    let mut request = UploadRequest::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("failed to parse multipart data: {e}"),
        )
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            FIELD_FILE => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    error_response(StatusCode::BAD_REQUEST, format!("failed to read file: {e}"))
                })?;
                request.file = Some(DocumentFile::new(filename, content_type, data));
            }
            FIELD_FOLDER | FIELD_COMPANY_NAME => {
                let value = field.text().await.map_err(|e| {
                    error_response(StatusCode::BAD_REQUEST, format!("failed to read {name}: {e}"))
                })?;
                if name == FIELD_FOLDER {
                    request.folder = Some(value);
                } else {
                    request.company_name = Some(value);
                }
            }
            other => tracing::debug!(field = other, "ignoring unknown upload field"),
        }
    }

    let upload = request.validate().map_err(to_error)?;
    let path = state
        .service
        .upload_document(upload.category, &upload.company_name, &upload.file)
        .await
        .map_err(to_error)?;
    Ok(Json(UploadedDocument { path }))
}
