use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use docintake_db::Database;
use docintake_service::LocalService;
use docintake_store::StoreConfig;
use tokio::net::TcpListener;

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;

/// Build a test service with in-memory SQLite and a temp local store.
pub fn test_service() -> LocalService {
    let db = Arc::new(docintake_db::SqliteDatabase::open_in_memory().unwrap());
    service_with(db, tempfile::tempdir().unwrap().keep())
}

/// Build a service over `db` with a local store rooted at `store_root`.
pub fn service_with(db: Arc<dyn Database>, store_root: PathBuf) -> LocalService {
    let store_config = StoreConfig {
        local_data_dir: Some(store_root.to_string_lossy().to_string()),
        ..Default::default()
    };
    let store = docintake_store::create_store(&store_config).unwrap();
    LocalService::new(db, store)
}

/// Build a test router whose object store fails every write: its root is
/// a regular file, not a directory.
pub async fn broken_store_router() -> Router {
    let dir = tempfile::tempdir().unwrap().keep();
    let root = dir.join("not-a-dir");
    std::fs::write(&root, b"x").unwrap();
    let db = Arc::new(docintake_db::SqliteDatabase::open_in_memory().unwrap());
    crate::build_router(service_with(db, root), DEFAULT_MAX_UPLOAD_BYTES)
}

/// Build a test router over [`test_service`].
pub async fn test_router() -> Router {
    crate::build_router(test_service(), DEFAULT_MAX_UPLOAD_BYTES)
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = test_router().await;
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}

pub const BOUNDARY: &str = "docintake-test-boundary";

/// One part of a hand-built multipart body.
pub struct MultipartPart<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    content_type: &'a str,
    data: &'a [u8],
}

impl<'a> MultipartPart<'a> {
    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            filename: None,
            content_type: "",
            data: value.as_bytes(),
        }
    }

    pub fn file(name: &'a str, filename: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            filename: Some(filename),
            content_type,
            data,
        }
    }
}

/// Encode `parts` as `multipart/form-data` delimited by [`BOUNDARY`].
pub fn multipart_body(parts: &[MultipartPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n",
                        part.name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(
                    format!("Content-Type: {}\r\n", part.content_type).as_bytes(),
                );
            }
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
