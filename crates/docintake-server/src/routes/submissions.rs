use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use docintake_core::submission::{CreateSubmission, Submission};
use docintake_service::IntakeService;

use super::{to_error, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/submissions",
            get(list_submissions).post(create_submission),
        )
        .route("/api/submissions/{id}", get(get_submission))
}

async fn list_submissions(State(state): State<AppState>) -> Result<Json<Vec<Submission>>, ApiError> {
    state
        .service
        .list_submissions()
        .await
        .map(Json)
        .map_err(to_error)
}

async fn create_submission(
    State(state): State<AppState>,
    Json(input): Json<CreateSubmission>,
) -> Result<(StatusCode, Json<Submission>), ApiError> {
    let submission = state
        .service
        .create_submission(&input)
        .await
        .map_err(to_error)?;
    Ok((StatusCode::CREATED, Json(submission)))
}

async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Submission>, ApiError> {
    state
        .service
        .get_submission(&id)
        .await
        .map(Json)
        .map_err(to_error)
}
