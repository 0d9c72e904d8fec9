use rusqlite::Connection;

use super::SqliteResultExt;
use crate::DbError;

pub(crate) const LATEST_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )
    .to_db()?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .to_db()?;

    if current_version < 1 {
        // v1: submission metadata. document_paths holds a JSON object keyed by category.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS submissions (
                id             TEXT PRIMARY KEY,
                company_name   TEXT NOT NULL,
                document_paths TEXT NOT NULL DEFAULT '{}',
                uploaded_at    TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_submissions_uploaded_at
                ON submissions(uploaded_at);",
        )
        .to_db()?;

        conn.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (1, datetime('now'))",
            [],
        )
        .to_db()?;
        tracing::debug!("applied sqlite migration v1");
    }

    Ok(())
}
