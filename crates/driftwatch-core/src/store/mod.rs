//! Storage abstraction for watcher state.
//!
//! The [`StateStore`] trait defines the durable-state operations the watcher
//! needs, enabling pluggable backends (flat JSON files, SQLite, in-memory).
//! Two records exist per target identifier: a mutable latest-state row and
//! an append-only history log.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ObservationRecord, PersistedState};

/// Durable state backend for the watcher.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`load_latest`](StateStore::load_latest) | Read the latest state for an identifier |
/// | [`save_latest`](StateStore::save_latest) | Atomically overwrite the latest state |
/// | [`append_history`](StateStore::append_history) | Append one record to the history log |
/// | [`load_history`](StateStore::load_history) | Read the full history, oldest first |
///
/// # Contracts
///
/// `save_latest` must be atomic: a concurrent reader sees either the old or
/// the new state, never a torn write, and a failed save leaves the prior
/// state intact. `append_history` is at-least-once under crash and retry;
/// readers tolerate duplicate records.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load_latest(&self, identifier: &str) -> Result<Option<PersistedState>>;

    async fn save_latest(&self, identifier: &str, state: &PersistedState) -> Result<()>;

    async fn append_history(&self, identifier: &str, record: &ObservationRecord) -> Result<()>;

    async fn load_history(&self, identifier: &str) -> Result<Vec<ObservationRecord>>;
}
