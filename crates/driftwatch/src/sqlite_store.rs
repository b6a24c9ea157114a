//! SQLite-backed [`StateStore`] implementation.
//!
//! The latest-state row is replaced with an `ON CONFLICT ... DO UPDATE`
//! upsert, which SQLite applies atomically, so a concurrent reader sees
//! either the old or the new row. History rows are insert-only.

use std::path::Path;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use driftwatch_core::models::{ObservationRecord, PersistedState};
use driftwatch_core::store::StateStore;

use crate::db;
use crate::migrate;

/// SQLite implementation of the [`StateStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to (or create) the database at `path` and ensure the schema
    /// exists.
    pub async fn connect(path: &Path) -> Result<Self> {
        let pool = db::connect(path).await?;
        migrate::run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }
}

fn timestamp_ms(record: &ObservationRecord) -> i64 {
    record.checked_at.timestamp_millis()
}

fn parse_timestamp_ms(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| anyhow!("invalid timestamp: {ms}"))
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<ObservationRecord> {
    let checked_at: i64 = row.get("checked_at");
    let content_length: i64 = row.get("content_length");
    Ok(ObservationRecord {
        checked_at: parse_timestamp_ms(checked_at)?,
        fingerprint: row.get("fingerprint"),
        content_length: content_length as usize,
        summary: row.get("summary"),
    })
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn load_latest(&self, identifier: &str) -> Result<Option<PersistedState>> {
        let row = sqlx::query(
            "SELECT address, checked_at, fingerprint, content_length, summary
             FROM latest_state WHERE identifier = ?",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(PersistedState {
                address: row.get("address"),
                record: row_to_record(&row)?,
            })),
            None => Ok(None),
        }
    }

    async fn save_latest(&self, identifier: &str, state: &PersistedState) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO latest_state (identifier, address, checked_at, fingerprint, content_length, summary)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(identifier) DO UPDATE SET
                address = excluded.address,
                checked_at = excluded.checked_at,
                fingerprint = excluded.fingerprint,
                content_length = excluded.content_length,
                summary = excluded.summary
            "#,
        )
        .bind(identifier)
        .bind(&state.address)
        .bind(timestamp_ms(&state.record))
        .bind(&state.record.fingerprint)
        .bind(state.record.content_length as i64)
        .bind(&state.record.summary)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn append_history(&self, identifier: &str, record: &ObservationRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO history (identifier, checked_at, fingerprint, content_length, summary)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(identifier)
        .bind(timestamp_ms(record))
        .bind(&record.fingerprint)
        .bind(record.content_length as i64)
        .bind(&record.summary)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load_history(&self, identifier: &str) -> Result<Vec<ObservationRecord>> {
        let rows = sqlx::query(
            "SELECT checked_at, fingerprint, content_length, summary
             FROM history WHERE identifier = ?
             ORDER BY checked_at ASC, id ASC",
        )
        .bind(identifier)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect()
    }
}
