use async_trait::async_trait;
use bytes::Bytes;
use docintake_core::submission::{CreateSubmission, Submission};
use docintake_core::DocumentCategory;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// One selected file, as received from the client.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl DocumentFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// Abstraction over the intake backend.
///
/// The orchestrator and the viewer program against this trait.
/// `LocalService` talks to the store and database directly.
/// `HttpService` talks to a running docintake-server.
#[async_trait]
pub trait IntakeService: Send + Sync {
    /// Store one file under its category and return the storage path.
    async fn upload_document(
        &self,
        category: DocumentCategory,
        company_name: &str,
        file: &DocumentFile,
    ) -> Result<String, ServiceError>;

    async fn create_submission(&self, input: &CreateSubmission) -> Result<Submission, ServiceError>;
    async fn get_submission(&self, id: &str) -> Result<Submission, ServiceError>;
    /// Newest first.
    async fn list_submissions(&self) -> Result<Vec<Submission>, ServiceError>;

    /// Resolve a storage path to a URL a browser can open.
    fn file_url(&self, path: &str) -> String;
}
