mod local;
#[cfg(feature = "s3")]
mod s3;

pub use local::LocalStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("store error: {0}")]
    Internal(String),
}

/// Blob storage for uploaded documents keyed by string paths.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object, overwriting any existing one under the same key.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StoreError>;

    /// Write an object only if nothing is stored under `key` yet.
    ///
    /// The check and the write are one atomic step on the backend. Returns
    /// `StoreError::AlreadyExists` when the key is taken; the existing
    /// object is left untouched.
    async fn put_new(&self, key: &str, data: Bytes, content_type: &str)
        -> Result<(), StoreError>;

    /// Read an object. Returns `StoreError::NotFound` if absent.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Check if an object exists.
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        match self.get(key).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// URL under which the backend serves the object directly, if it does.
    ///
    /// `None` means the object is only reachable through the server's own
    /// file route.
    fn public_url(&self, key: &str) -> Option<String>;
}

// -- Key helpers --

/// `{category}/{file_name}`, the address of one uploaded document.
pub fn document_key(category: &str, file_name: &str) -> String {
    format!("{category}/{file_name}")
}

/// Reject keys that could escape the store root or address a directory.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        Err(StoreError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}

/// Percent-encode each `/`-separated segment of `key` for use in a URL path.
pub fn encode_key(key: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return key.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().extend(key.split('/'));
    }
    url.path().trim_start_matches('/').to_string()
}

/// Best-effort content type from the key's extension.
pub fn content_type_for_key(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

// -- Configuration --

/// Configuration for the object store backend.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// S3-compatible endpoint URL (e.g., "http://127.0.0.1:3900").
    /// When `None`, use local filesystem.
    pub endpoint_url: Option<String>,
    /// S3 region (e.g., "garage", "us-east-1").
    pub region: Option<String>,
    /// S3 bucket name.
    pub bucket: Option<String>,
    /// AWS access key ID.
    pub access_key_id: Option<String>,
    /// AWS secret access key.
    pub secret_access_key: Option<String>,
    /// Base URL the bucket is publicly readable under. Defaults to the
    /// path-style `{endpoint}/{bucket}` for S3.
    pub public_base_url: Option<String>,
    /// Local filesystem base directory (used when S3 is not configured).
    pub local_data_dir: Option<String>,
}

impl StoreConfig {
    /// Build from environment variables.
    /// If `DOCINTAKE_S3_ENDPOINT` (or `AWS_ENDPOINT_URL`) is set along with
    /// credentials and a bucket name, use S3. Otherwise, fall back to local filesystem.
    pub fn from_env() -> Self {
        Self {
            endpoint_url: std::env::var("DOCINTAKE_S3_ENDPOINT")
                .or_else(|_| std::env::var("AWS_ENDPOINT_URL"))
                .ok(),
            region: std::env::var("DOCINTAKE_S3_REGION")
                .or_else(|_| std::env::var("AWS_REGION"))
                .ok(),
            bucket: std::env::var("DOCINTAKE_S3_BUCKET").ok(),
            access_key_id: std::env::var("DOCINTAKE_S3_ACCESS_KEY_ID")
                .or_else(|_| std::env::var("AWS_ACCESS_KEY_ID"))
                .ok(),
            secret_access_key: std::env::var("DOCINTAKE_S3_SECRET_ACCESS_KEY")
                .or_else(|_| std::env::var("AWS_SECRET_ACCESS_KEY"))
                .ok(),
            public_base_url: std::env::var("DOCINTAKE_S3_PUBLIC_URL").ok(),
            local_data_dir: std::env::var("DOCINTAKE_DATA_DIR").ok(),
        }
    }

    pub fn is_s3(&self) -> bool {
        self.endpoint_url.is_some()
            && self.access_key_id.is_some()
            && self.secret_access_key.is_some()
            && self.bucket.is_some()
    }
}

// -- Factory --

/// Create an `ObjectStore` from configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ObjectStore>, StoreError> {
    if config.is_s3() {
        #[cfg(feature = "s3")]
        {
            tracing::info!(bucket = ?config.bucket, "using s3 object store");
            Ok(Arc::new(S3Store::new(config)?))
        }
        #[cfg(not(feature = "s3"))]
        {
            Err(StoreError::Internal(
                "S3 configuration detected but the 's3' feature is not enabled".into(),
            ))
        }
    } else {
        let store = LocalStore::new(config);
        tracing::info!(dir = %store.base_dir().display(), "using local object store");
        Ok(Arc::new(store))
    }
}
