//! Core data models for Driftwatch.
//!
//! These types describe a watched target and the observations the watcher
//! persists for it: a mutable latest-state record plus an append-only
//! history of every completed check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::target_identifier;

/// A resource to watch for content changes.
///
/// The address and extraction spec are opaque to the watcher; both are handed
/// to the fetch collaborator verbatim and never interpreted here. Targets are
/// created by the caller before a run starts and stay immutable for its
/// duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    /// Resource locator passed to the fetch collaborator.
    pub address: String,
    /// Description of what to extract and compare, passed through verbatim.
    pub extraction_spec: String,
}

impl WatchTarget {
    pub fn new(address: impl Into<String>, extraction_spec: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            extraction_spec: extraction_spec.into(),
        }
    }

    /// Stable storage key for this target, derived from the address.
    ///
    /// The same address always maps to the same identifier, so persisted
    /// state survives restarts; distinct addresses never share one.
    pub fn identifier(&self) -> String {
        target_identifier(&self.address)
    }
}

/// One observation of a target's content, produced per completed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// When the check ran. Strictly increasing across consecutive records
    /// for the same target.
    pub checked_at: DateTime<Utc>,
    /// Lowercase hex SHA-256 of the fetched content.
    pub fingerprint: String,
    /// Size of the fetched content in bytes. Diagnostics only; change
    /// detection relies on the fingerprint alone.
    pub content_length: usize,
    /// Opaque extraction result, stored verbatim.
    pub summary: String,
}

/// Latest-only persisted state for one target.
///
/// At most one of these exists per identifier at any time; saving a new one
/// atomically replaces the prior state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub address: String,
    #[serde(flatten)]
    pub record: ObservationRecord,
}

/// Result of a single check, reported to the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// True when the fingerprint differs from the previous observation.
    /// Always false for the first observation.
    pub changed: bool,
    /// True when no prior state existed for the target. The first check
    /// establishes the baseline and is not reported as a change.
    pub first_observation: bool,
    pub previous_fingerprint: Option<String>,
    pub current_fingerprint: String,
    /// The record persisted for this check.
    pub record: ObservationRecord,
}
