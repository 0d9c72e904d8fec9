use rusqlite::types::Type;
use rusqlite::{params, Row};

use docintake_core::submission::{CreateSubmission, DocumentPaths, Submission};

use super::super::{SqliteDatabase, SqliteResultExt};
use crate::DbError;

fn row_to_submission(row: &Row) -> rusqlite::Result<Submission> {
    let raw: String = row.get("document_paths")?;
    let document_paths: DocumentPaths = serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(Submission {
        id: row.get("id")?,
        company_name: row.get("company_name")?,
        document_paths,
        uploaded_at: row.get("uploaded_at")?,
    })
}

impl SqliteDatabase {
    pub fn create_submission_sync(&self, input: &CreateSubmission) -> Result<Submission, DbError> {
        let paths = serde_json::to_string(&input.document_paths)
            .map_err(|e| DbError::Internal(format!("encode document_paths: {e}")))?;
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO submissions (id, company_name, document_paths, uploaded_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, input.company_name, paths, input.uploaded_at],
            )
            .to_db()?;
            conn.query_row(
                "SELECT * FROM submissions WHERE id = ?1",
                params![id],
                row_to_submission,
            )
            .to_db()
        })
    }

    pub fn get_submission_sync(&self, id: &str) -> Result<Submission, DbError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM submissions WHERE id = ?1",
                params![id],
                row_to_submission,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    DbError::NotFound(format!("submission {id}"))
                }
                other => DbError::Internal(other.to_string()),
            })
        })
    }

    pub fn list_submissions_sync(&self) -> Result<Vec<Submission>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM submissions ORDER BY uploaded_at DESC, rowid DESC")
                .to_db()?;
            let submissions = stmt
                .query_map([], row_to_submission)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(submissions)
        })
    }
}
