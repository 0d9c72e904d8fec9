use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use docintake_core::submission::{CreateSubmission, Submission};
use docintake_core::DocumentCategory;
use docintake_db::Database;
use docintake_store::{encode_key, ObjectStore};

use crate::proxy::store_document;
use crate::{DocumentFile, IntakeService, ServiceError};

/// Local implementation backed by direct database and object store access.
#[derive(Clone)]
pub struct LocalService {
    db: Arc<dyn Database>,
    store: Arc<dyn ObjectStore>,
    public_base: String,
}

impl LocalService {
    pub fn new(db: Arc<dyn Database>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            db,
            store,
            public_base: String::new(),
        }
    }

    /// Prefix for file URLs when the store has no public URL of its own,
    /// e.g. `https://intake.example.com`. Empty means site-relative links.
    pub fn with_public_base(mut self, base: &str) -> Self {
        self.public_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

impl From<docintake_db::DbError> for ServiceError {
    fn from(e: docintake_db::DbError) -> Self {
        match e {
            docintake_db::DbError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

#[async_trait]
impl IntakeService for LocalService {
    async fn upload_document(
        &self,
        category: DocumentCategory,
        company_name: &str,
        file: &DocumentFile,
    ) -> Result<String, ServiceError> {
        if company_name.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "missing required field: companyName".into(),
            ));
        }
        let millis = Utc::now().timestamp_millis();
        store_document(self.store.as_ref(), category, company_name, file, millis).await
    }

    async fn create_submission(&self, input: &CreateSubmission) -> Result<Submission, ServiceError> {
        if input.company_name.trim().is_empty() {
            return Err(ServiceError::InvalidInput("company name is required".into()));
        }
        Ok(self.db.create_submission(input).await?)
    }

    async fn get_submission(&self, id: &str) -> Result<Submission, ServiceError> {
        Ok(self.db.get_submission(id).await?)
    }

    async fn list_submissions(&self) -> Result<Vec<Submission>, ServiceError> {
        Ok(self.db.list_submissions().await?)
    }

    fn file_url(&self, path: &str) -> String {
        self.store
            .public_url(path)
            .unwrap_or_else(|| format!("{}/files/{}", self.public_base, encode_key(path)))
    }
}
