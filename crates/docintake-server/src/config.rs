use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use docintake_core::DocumentCategory;

pub const DEFAULT_PORT: u16 = 3720;
/// 50 MiB, enough for a handful of scanned PDFs per request.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "DOCINTAKE_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on
    #[arg(long, env = "DOCINTAKE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// External base URL used in file links, e.g. https://intake.example.com.
    /// Empty means links are site-relative.
    #[arg(long, env = "DOCINTAKE_PUBLIC_URL", default_value = "")]
    pub public_url: String,

    /// Largest request body accepted, in bytes
    #[arg(long, env = "DOCINTAKE_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl ServeArgs {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip = self
            .bind
            .parse()
            .with_context(|| format!("invalid bind address: {}", self.bind))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Args)]
pub struct ClientArgs {
    /// Server URL
    #[arg(long, env = "DOCINTAKE_SERVER_URL", default_value = "http://127.0.0.1:3720")]
    pub server: String,
}

/// `CATEGORY=PATH`, as given to `submit --file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArg {
    pub category: DocumentCategory,
    pub path: PathBuf,
}

pub fn parse_file_arg(s: &str) -> Result<FileArg, String> {
    let (category, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=PATH, got {s:?}"))?;
    let category: DocumentCategory = category.trim().parse().map_err(|e| format!("{e}"))?;
    if path.is_empty() {
        return Err(format!("missing path for {category}"));
    }
    Ok(FileArg {
        category,
        path: PathBuf::from(path),
    })
}

#[derive(Debug, Clone, Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    /// Company name recorded with the submission
    #[arg(long)]
    pub company: String,

    /// A document to upload, as CATEGORY=PATH. Repeat for more files.
    #[arg(long = "file", value_parser = parse_file_arg)]
    pub files: Vec<FileArg>,
}
