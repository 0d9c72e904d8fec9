pub(crate) mod migrations;
pub mod queries;

pub use migrations::MIGRATION_LOCK_KEY;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use docintake_core::submission::{CreateSubmission, Submission};

use crate::{Database, DbError};

/// Map a sqlx::Error into a DbError::Internal.
pub(crate) fn pg_err(e: sqlx::Error) -> DbError {
    DbError::Internal(e.to_string())
}

/// Create a DbError::NotFound with the given entity description.
pub(crate) fn pg_not_found(entity: &str) -> DbError {
    DbError::NotFound(entity.to_string())
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pub(crate) pool: PgPool,
}

impl PostgresDatabase {
    /// Connect to a Postgres database and run migrations.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(pg_err)?;

        let db = Self { pool };
        migrations::run(&db.pool).await?;
        Ok(db)
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn create_submission(&self, input: &CreateSubmission) -> Result<Submission, DbError> {
        self.pg_create_submission(input).await
    }
    async fn get_submission(&self, id: &str) -> Result<Submission, DbError> {
        self.pg_get_submission(id).await
    }
    async fn list_submissions(&self) -> Result<Vec<Submission>, DbError> {
        self.pg_list_submissions().await
    }
}
