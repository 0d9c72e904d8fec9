use sqlx::pool::PoolConnection;
use sqlx::{Connection, PgConnection, PgPool, Postgres};

use super::pg_err;
use crate::DbError;

/// Arbitrary but fixed key for the Postgres advisory lock that serialises
/// migration runs across server processes.
pub const MIGRATION_LOCK_KEY: i64 = 0x646F_6369_6E74_616B; // "docintak" as hex

pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    // Session-level lock: lock, migrate and unlock must share one connection.
    let mut conn = pool.acquire().await.map_err(pg_err)?;
    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .map_err(pg_err)?;

    let result = run_inner(&mut conn).await;
    release_lock(conn).await;
    result
}

/// Unlock on the session that holds the lock. If that fails, close the
/// session instead of returning it to the pool still holding the lock.
async fn release_lock(mut conn: PoolConnection<Postgres>) {
    let unlocked = sqlx::query_scalar::<_, bool>("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .fetch_one(&mut *conn)
        .await;
    let reason = match unlocked {
        Ok(true) => return,
        Ok(false) => "lock was not held by this session".to_string(),
        Err(e) => e.to_string(),
    };
    tracing::warn!("migration lock release failed ({reason}), closing connection");
    if let Err(e) = conn.detach().close().await {
        tracing::warn!("closing migration connection failed: {e}");
    }
}

async fn run_inner(conn: &mut PgConnection) -> Result<(), DbError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(&mut *conn)
    .await
    .map_err(pg_err)?;

    let current: i32 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
        .fetch_one(&mut *conn)
        .await
        .map_err(pg_err)?;

    if current < 1 {
        sqlx::raw_sql(include_str!("sql/V1__initial.sql"))
            .execute(&mut *conn)
            .await
            .map_err(pg_err)?;
        tracing::debug!("applied postgres migration v1");
    }

    Ok(())
}
