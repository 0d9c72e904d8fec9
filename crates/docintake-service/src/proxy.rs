//! Upload proxy: validate one upload, derive its storage key and write the
//! bytes to the object store. Holds no state between calls and never
//! retries; the caller decides what to do with a failure.

use docintake_core::sanitize::storage_file_name;
use docintake_core::upload::client_file_name;
use docintake_core::DocumentCategory;
use docintake_store::{content_type_for_key, document_key, ObjectStore, StoreError};

use crate::{DocumentFile, ServiceError};

/// How many consecutive milliseconds to try before giving up on a free key.
const MAX_KEY_ATTEMPTS: i64 = 64;

/// Raw upload fields, any of which may be missing.
#[derive(Debug, Default)]
pub struct UploadRequest {
    pub file: Option<DocumentFile>,
    pub folder: Option<String>,
    pub company_name: Option<String>,
}

/// An upload whose required fields are all present and well-formed.
#[derive(Debug)]
pub struct ValidUpload {
    pub category: DocumentCategory,
    pub company_name: String,
    pub file: DocumentFile,
}

impl UploadRequest {
    pub fn validate(self) -> Result<ValidUpload, ServiceError> {
        let file = self
            .file
            .filter(|f| !f.filename.is_empty())
            .ok_or_else(|| ServiceError::InvalidInput("missing required field: file".into()))?;
        let folder = self
            .folder
            .filter(|f| !f.trim().is_empty())
            .ok_or_else(|| ServiceError::InvalidInput("missing required field: folder".into()))?;
        let category = folder
            .trim()
            .parse::<DocumentCategory>()
            .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
        let company_name = self
            .company_name
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                ServiceError::InvalidInput("missing required field: companyName".into())
            })?;
        Ok(ValidUpload {
            category,
            company_name,
            file,
        })
    }
}

/// Write `file` under `{category}/{sanitized name}` and return that path.
///
/// `millis` is the timestamp baked into the name. If the key is already
/// taken, the timestamp is advanced one millisecond at a time until the
/// store accepts a create-if-absent write, so a stored file is never
/// overwritten.
pub async fn store_document(
    store: &dyn ObjectStore,
    category: DocumentCategory,
    company_name: &str,
    file: &DocumentFile,
    millis: i64,
) -> Result<String, ServiceError> {
    let filename = client_file_name(&file.filename);
    if filename.is_empty() {
        return Err(ServiceError::InvalidInput("missing required field: file".into()));
    }

    let content_type = if file.content_type.is_empty() {
        content_type_for_key(filename)
    } else {
        file.content_type.as_str()
    };

    for attempt in 0..MAX_KEY_ATTEMPTS {
        let name = storage_file_name(company_name, filename, millis + attempt);
        let key = document_key(category.as_str(), &name);
        match store.put_new(&key, file.data.clone(), content_type).await {
            Ok(()) => {
                tracing::info!(key = %key, bytes = file.data.len(), "stored document");
                return Ok(key);
            }
            Err(StoreError::AlreadyExists(_)) => continue,
            Err(e) => return Err(storage_error(e)),
        }
    }

    Err(ServiceError::Internal(format!(
        "no free storage key for {filename} after {MAX_KEY_ATTEMPTS} attempts"
    )))
}

fn storage_error(e: StoreError) -> ServiceError {
    tracing::error!("storage write failed: {e}");
    ServiceError::Internal(e.to_string())
}
