use anyhow::Result;
use sqlx::SqlitePool;

/// Create the watcher schema. Idempotent; safe to run on every start.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Latest-only state, one row per target identifier
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS latest_state (
            identifier TEXT PRIMARY KEY,
            address TEXT NOT NULL,
            checked_at INTEGER NOT NULL,
            fingerprint TEXT NOT NULL,
            content_length INTEGER NOT NULL,
            summary TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Append-only history
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            identifier TEXT NOT NULL,
            checked_at INTEGER NOT NULL,
            fingerprint TEXT NOT NULL,
            content_length INTEGER NOT NULL,
            summary TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_history_identifier ON history(identifier, checked_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
