use async_trait::async_trait;
use docintake_core::submission::{CreateSubmission, Submission};
use docintake_core::upload::{UploadedDocument, FIELD_COMPANY_NAME, FIELD_FILE, FIELD_FOLDER};
use docintake_core::DocumentCategory;
use docintake_store::encode_key;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use crate::{DocumentFile, IntakeService, ServiceError};

/// Async HTTP client implementation of IntakeService.
/// Connects to a running docintake-server.
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the server is reachable.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post_multipart<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ServiceError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    /// Download a stored file's bytes through the server's file route.
    pub async fn fetch_file(&self, path: &str) -> Result<bytes::Bytes, ServiceError> {
        let resp = self
            .client
            .get(self.file_url(path))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            resp.bytes()
                .await
                .map_err(|e| ServiceError::Internal(format!("read body: {e}")))
        } else {
            Err(parse_error_with_status(status, resp).await)
        }
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error_with_status(
    status: StatusCode,
    resp: reqwest::Response,
) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(msg)
    } else if status == StatusCode::BAD_REQUEST {
        ServiceError::InvalidInput(msg)
    } else {
        ServiceError::Internal(msg)
    }
}

#[async_trait]
impl IntakeService for HttpService {
    async fn upload_document(
        &self,
        category: DocumentCategory,
        company_name: &str,
        file: &DocumentFile,
    ) -> Result<String, ServiceError> {
        let mut part = Part::bytes(file.data.to_vec()).file_name(file.filename.clone());
        if !file.content_type.is_empty() {
            part = part
                .mime_str(&file.content_type)
                .map_err(|e| ServiceError::InvalidInput(format!("content type: {e}")))?;
        }
        let form = Form::new()
            .part(FIELD_FILE, part)
            .text(FIELD_FOLDER, category.as_str())
            .text(FIELD_COMPANY_NAME, company_name.to_string());
        let uploaded: UploadedDocument = self.post_multipart("/api/upload", form).await?;
        Ok(uploaded.path)
    }

    async fn create_submission(&self, input: &CreateSubmission) -> Result<Submission, ServiceError> {
        self.post_json("/api/submissions", input).await
    }

    async fn get_submission(&self, id: &str) -> Result<Submission, ServiceError> {
        self.get_json(&format!("/api/submissions/{id}")).await
    }

    async fn list_submissions(&self) -> Result<Vec<Submission>, ServiceError> {
        self.get_json("/api/submissions").await
    }

    fn file_url(&self, path: &str) -> String {
        format!("{}/files/{}", self.base_url, encode_key(path))
    }
}
