//! Browser-facing pages: the submission form and the submission list.

use askama::Template;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use docintake_core::upload::FIELD_COMPANY_NAME;
use docintake_core::DocumentCategory;
use docintake_service::viewer::{load_views, SubmissionView, NO_DOCUMENTS};
use docintake_service::{submit, DocumentFile, SubmissionForm, SubmitError};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(form_page))
        .route("/submit", post(submit_form))
        .route("/submissions", get(submissions_page))
}

struct CategoryField {
    key: &'static str,
    label: &'static str,
}

struct Notice {
    /// CSS class: `success`, `warning` or `error`.
    kind: &'static str,
    message: String,
    details: Vec<String>,
}

#[derive(Template)]
#[template(path = "form.html")]
struct FormTemplate {
    categories: Vec<CategoryField>,
    company_name: String,
    notice: Option<Notice>,
}

impl FormTemplate {
    fn new(company_name: String, notice: Option<Notice>) -> Self {
        Self {
            categories: DocumentCategory::ALL
                .iter()
                .map(|c| CategoryField {
                    key: c.as_str(),
                    label: c.display_name(),
                })
                .collect(),
            company_name,
            notice,
        }
    }
}

#[derive(Template)]
#[template(path = "submissions.html")]
struct SubmissionsTemplate {
    views: Vec<SubmissionView>,
    error: Option<String>,
    no_documents: &'static str,
}

fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("template render failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
        }
    }
}

async fn form_page() -> Response {
    render(StatusCode::OK, &FormTemplate::new(String::new(), None))
}

/// Collect the browser form. Inputs left empty arrive as parts with an
/// empty filename and are dropped.
async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, String> {
    let mut form = SubmissionForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("failed to read form: {e}"))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == FIELD_COMPANY_NAME {
            form.company_name = field
                .text()
                .await
                .map_err(|e| format!("failed to read company name: {e}"))?;
            continue;
        }
        let Ok(category) = name.parse::<DocumentCategory>() else {
            tracing::debug!(field = %name, "ignoring unknown form field");
            continue;
        };
        let filename = field.file_name().unwrap_or("").to_string();
        if filename.is_empty() {
            continue;
        }
        let content_type = field.content_type().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| format!("failed to read {filename}: {e}"))?;
        form.add_file(category, DocumentFile::new(filename, content_type, data));
    }
    Ok(form)
}

async fn submit_form(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match multipart {
        Ok(multipart) => read_form(multipart).await,
        Err(e) => Err(e.body_text()),
    };
    let form = match form {
        Ok(form) => form,
        Err(message) => {
            let notice = Notice {
                kind: "error",
                message,
                details: Vec::new(),
            };
            return render(
                StatusCode::BAD_REQUEST,
                &FormTemplate::new(String::new(), Some(notice)),
            );
        }
    };

    match submit(&state.service, &form).await {
        Ok(report) => {
            let details: Vec<String> = report
                .failures
                .iter()
                .map(|f| format!("{} ({}): {}", f.filename, f.category.display_name(), f.message))
                .collect();
            let notice = Notice {
                kind: if details.is_empty() { "success" } else { "warning" },
                message: format!(
                    "Documents submitted: {} file(s) saved for {}.",
                    report.submission.document_paths.total(),
                    report.submission.company_name
                ),
                details,
            };
            render(StatusCode::OK, &FormTemplate::new(String::new(), Some(notice)))
        }
        Err(e) => {
            let (status, details) = match &e {
                SubmitError::Validation(_) => (StatusCode::BAD_REQUEST, Vec::new()),
                SubmitError::TotalFailure { attempted: 0, .. } => {
                    (StatusCode::BAD_REQUEST, Vec::new())
                }
                SubmitError::TotalFailure { failures, .. } => (
                    StatusCode::BAD_GATEWAY,
                    failures
                        .iter()
                        .map(|f| format!("{} ({}): {}", f.filename, f.category.display_name(), f.message))
                        .collect(),
                ),
                SubmitError::Persistence { .. } => (StatusCode::INTERNAL_SERVER_ERROR, Vec::new()),
            };
            let notice = Notice {
                kind: "error",
                message: e.to_string(),
                details,
            };
            render(status, &FormTemplate::new(form.company_name, Some(notice)))
        }
    }
}

async fn submissions_page(State(state): State<AppState>) -> Response {
    let (views, error) = match load_views(&state.service).await {
        Ok(views) => (views, None),
        Err(e) => {
            tracing::error!("failed to load submissions: {e}");
            (Vec::new(), Some(e.to_string()))
        }
    };
    let status = if error.is_some() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    render(
        status,
        &SubmissionsTemplate {
            views,
            error,
            no_documents: NO_DOCUMENTS,
        },
    )
}
