use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use s3::Bucket;

use crate::{encode_key, ObjectStore, StoreConfig, StoreError};

pub struct S3Store {
    bucket: Box<Bucket>,
    public_base: String,
}

impl std::fmt::Debug for S3Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Store")
            .field("public_base", &self.public_base)
            .finish_non_exhaustive()
    }
}

impl S3Store {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let endpoint = config.endpoint_url.clone().unwrap_or_default();
        let region = Region::Custom {
            region: config.region.clone().unwrap_or_else(|| "us-east-1".into()),
            endpoint: endpoint.clone(),
        };

        let credentials = Credentials::new(
            config.access_key_id.as_deref(),
            config.secret_access_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StoreError::Internal(format!("credentials: {e}")))?;

        let bucket_name = config
            .bucket
            .as_deref()
            .ok_or_else(|| StoreError::Internal("bucket name required".into()))?;

        let mut bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| StoreError::Internal(format!("bucket: {e}")))?;
        bucket.set_path_style();

        let public_base = config
            .public_base_url
            .clone()
            .unwrap_or_else(|| format!("{}/{bucket_name}", endpoint.trim_end_matches('/')));

        Ok(Self {
            bucket,
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }
}

fn map_s3_error(e: S3Error) -> StoreError {
    StoreError::Internal(format!("s3: {e}"))
}

/// Status codes a conditional `If-None-Match: *` PUT answers with when the
/// key is taken. 409 is what some S3-compatible stores send for a
/// concurrent conditional write.
fn is_precondition_failure(status: u16) -> bool {
    status == 412 || status == 409
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StoreError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(map_s3_error)?;
        if response.status_code() >= 400 {
            return Err(StoreError::Internal(format!(
                "s3 put {}: status {}: {}",
                key,
                response.status_code(),
                String::from_utf8_lossy(&response.to_vec())
            )));
        }
        Ok(())
    }

    async fn put_new(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StoreError> {
        let request = self
            .bucket
            .put_object_builder(key, data.as_ref())
            .with_content_type(content_type)
            .with_header("If-None-Match", "*")
            .map_err(map_s3_error)?;
        let status = match request.execute().await {
            Ok(response) => response.status_code(),
            Err(S3Error::HttpFailWithBody(status, _)) if is_precondition_failure(status) => status,
            Err(e) => return Err(map_s3_error(e)),
        };
        if is_precondition_failure(status) {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        if status >= 400 {
            return Err(StoreError::Internal(format!("s3 put {key}: status {status}")));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let response = self.bucket.get_object(key).await.map_err(map_s3_error)?;
        if response.status_code() == 404 {
            return Err(StoreError::NotFound(key.to_string()));
        }
        if response.status_code() >= 400 {
            return Err(StoreError::Internal(format!(
                "s3 get {}: status {}",
                key,
                response.status_code()
            )));
        }
        Ok(Bytes::from(response.to_vec()))
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        match self.bucket.head_object(key).await {
            Ok((_, 404)) | Err(S3Error::HttpFailWithBody(404, _)) => Ok(false),
            Ok((_, status)) if status >= 400 => Err(StoreError::Internal(format!(
                "s3 head {key}: status {status}"
            ))),
            Ok(_) => Ok(true),
            Err(e) => Err(map_s3_error(e)),
        }
    }

    fn public_url(&self, key: &str) -> Option<String> {
        Some(format!("{}/{}", self.public_base, encode_key(key)))
    }
}
