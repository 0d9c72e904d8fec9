use chrono::{DateTime, Utc};
use sqlx::types::Json;

use docintake_core::submission::{CreateSubmission, DocumentPaths, Submission};

use super::super::{pg_err, pg_not_found, PostgresDatabase};
use crate::DbError;

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: String,
    company_name: String,
    document_paths: Json<DocumentPaths>,
    uploaded_at: DateTime<Utc>,
}

impl From<SubmissionRow> for Submission {
    fn from(r: SubmissionRow) -> Self {
        Submission {
            id: r.id,
            company_name: r.company_name,
            document_paths: r.document_paths.0,
            uploaded_at: r.uploaded_at,
        }
    }
}

impl PostgresDatabase {
    pub(crate) async fn pg_create_submission(
        &self,
        input: &CreateSubmission,
    ) -> Result<Submission, DbError> {
        let id = uuid::Uuid::new_v4().to_string();

        let row = sqlx::query_as::<_, SubmissionRow>(
            "INSERT INTO submissions (id, company_name, document_paths, uploaded_at)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&id)
        .bind(&input.company_name)
        .bind(Json(&input.document_paths))
        .bind(input.uploaded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(row.into())
    }

    pub(crate) async fn pg_get_submission(&self, id: &str) -> Result<Submission, DbError> {
        let row = sqlx::query_as::<_, SubmissionRow>("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(pg_err)?
            .ok_or_else(|| pg_not_found(&format!("submission {id}")))?;

        Ok(row.into())
    }

    pub(crate) async fn pg_list_submissions(&self) -> Result<Vec<Submission>, DbError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            "SELECT * FROM submissions ORDER BY uploaded_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
