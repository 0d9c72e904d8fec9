pub mod config;
mod routes;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use anyhow::Result;
use docintake_service::LocalService;
use tokio::net::TcpListener;

pub use routes::{build_router, AppState, InnerAppState};

pub async fn serve(listener: TcpListener, service: LocalService, max_upload_bytes: usize) -> Result<()> {
    let app = build_router(service, max_upload_bytes);
    axum::serve(listener, app).await?;
    Ok(())
}
