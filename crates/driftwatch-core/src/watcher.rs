//! The change watcher: fetch, fingerprint, compare, persist.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::error::WatchError;
use crate::fetch::Fetcher;
use crate::fingerprint::content_fingerprint;
use crate::models::{CheckOutcome, ObservationRecord, PersistedState, WatchTarget};
use crate::store::StateStore;

/// Reporting sink for completed checks.
///
/// The observer is the only channel for both successes and failures; the
/// watch loops never propagate per-check errors to their caller. Observers
/// should return promptly, and the loops additionally bound observer latency
/// with a timeout so a slow observer cannot stall checking.
#[async_trait]
pub trait CheckObserver: Send + Sync {
    /// Called once per completed check.
    async fn on_check(&self, target: &WatchTarget, outcome: &CheckOutcome);

    /// Called once per failed check.
    async fn on_error(&self, target: &WatchTarget, error: &WatchError);

    /// Called when a target's loop terminates through cancellation.
    async fn on_cancelled(&self, _target: &WatchTarget) {}
}

/// Detects content changes for watch targets.
///
/// Holds the fetch collaborator and the store handle; the lifecycle of both
/// is owned by the caller. Cloning is cheap and shares the underlying
/// handles, so one watcher can serve many concurrent target loops.
#[derive(Clone)]
pub struct ChangeWatcher {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn StateStore>,
}

impl ChangeWatcher {
    pub fn new(fetcher: Arc<dyn Fetcher>, store: Arc<dyn StateStore>) -> Self {
        Self { fetcher, store }
    }

    /// Run one check for `target`: fetch, fingerprint, compare against the
    /// last persisted state, then persist the new state and history record.
    ///
    /// "Content unchanged" is a normal outcome, not an error. The first
    /// observation for a fresh identifier establishes the baseline and
    /// reports `changed = false` regardless of content.
    pub async fn check_once(&self, target: &WatchTarget) -> Result<CheckOutcome, WatchError> {
        let identifier = target.identifier();

        let fetched = self
            .fetcher
            .fetch(&target.address, &target.extraction_spec)
            .await
            .map_err(|source| WatchError::Fetch {
                address: target.address.clone(),
                source,
            })?;

        let fingerprint = content_fingerprint(&fetched.content);

        let previous = self
            .store
            .load_latest(&identifier)
            .await
            .map_err(|source| WatchError::Storage {
                identifier: identifier.clone(),
                source,
            })?;

        let (changed, first_observation, previous_fingerprint) = match &previous {
            Some(state) => (
                state.record.fingerprint != fingerprint,
                false,
                Some(state.record.fingerprint.clone()),
            ),
            None => (false, true, None),
        };

        // Timestamps must strictly increase per target, even when the wall
        // clock has not advanced past the previous check. Compared at
        // millisecond granularity, the coarsest precision a store keeps.
        let mut checked_at = Utc::now();
        if let Some(state) = &previous {
            if checked_at.timestamp_millis() <= state.record.checked_at.timestamp_millis() {
                checked_at = state.record.checked_at + Duration::milliseconds(1);
            }
        }

        let record = ObservationRecord {
            checked_at,
            fingerprint: fingerprint.clone(),
            content_length: fetched.content.len(),
            summary: fetched.summary,
        };

        let state = PersistedState {
            address: target.address.clone(),
            record: record.clone(),
        };

        // Latest state first, then history: a crash between the two loses a
        // history row, never the latest state.
        self.store
            .save_latest(&identifier, &state)
            .await
            .map_err(|source| WatchError::Storage {
                identifier: identifier.clone(),
                source,
            })?;

        self.store
            .append_history(&identifier, &record)
            .await
            .map_err(|source| WatchError::Storage {
                identifier: identifier.clone(),
                source,
            })?;

        tracing::debug!(
            address = %target.address,
            changed,
            first_observation,
            "check complete"
        );

        Ok(CheckOutcome {
            changed,
            first_observation,
            previous_fingerprint,
            current_fingerprint: fingerprint,
            record,
        })
    }
}
