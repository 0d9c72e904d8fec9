#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use docintake_core::submission::{CreateSubmission, Submission};
use thiserror::Error;

#[cfg(feature = "postgres")]
pub use postgres::PostgresDatabase;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence for submission metadata. Records are insert-only.
#[async_trait]
pub trait Database: Send + Sync {
    async fn create_submission(&self, input: &CreateSubmission) -> Result<Submission, DbError>;
    async fn get_submission(&self, id: &str) -> Result<Submission, DbError>;
    /// All submissions, newest `uploaded_at` first.
    async fn list_submissions(&self) -> Result<Vec<Submission>, DbError>;
}

/// Which backend to open and where.
#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    /// Postgres connection URL. Takes precedence over SQLite when set.
    pub database_url: Option<String>,
    /// SQLite file path. Defaults to `{data_dir}/docintake.db`.
    pub sqlite_path: Option<String>,
}

impl DbConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DOCINTAKE_DATABASE_URL").ok(),
            sqlite_path: std::env::var("DOCINTAKE_SQLITE_PATH").ok(),
        }
    }
}

/// Open the configured backend and run its migrations.
pub async fn open_database(config: &DbConfig) -> Result<Arc<dyn Database>, DbError> {
    if let Some(url) = &config.database_url {
        #[cfg(feature = "postgres")]
        {
            tracing::info!("using postgres database");
            return Ok(Arc::new(PostgresDatabase::connect(url).await?));
        }
        #[cfg(not(feature = "postgres"))]
        {
            let _ = url;
            return Err(DbError::Internal(
                "DOCINTAKE_DATABASE_URL is set but the 'postgres' feature is not enabled".into(),
            ));
        }
    }

    #[cfg(feature = "sqlite")]
    {
        let db = SqliteDatabase::open(config)?;
        tracing::info!("using sqlite database");
        Ok(Arc::new(db))
    }
    #[cfg(not(feature = "sqlite"))]
    {
        Err(DbError::Internal(
            "no database configured and the 'sqlite' feature is not enabled".into(),
        ))
    }
}

/// `$XDG_DATA_HOME/docintake`, falling back to `~/.local/share/docintake`.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("docintake")
}
