//! Error taxonomy for the watcher.
//!
//! The two variants separate a transient fetch problem from a broken
//! persistence layer so callers can react differently. Cancellation is not
//! an error: a cancelled loop reports a clean termination through the
//! observer instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    /// The external fetch/extract call failed (network, timeout, extraction
    /// error). Recovered locally: the loop reports it to the observer and
    /// retries after the normal interval.
    #[error("fetch failed for {address}: {source}")]
    Fetch {
        address: String,
        #[source]
        source: anyhow::Error,
    },

    /// Loading or persisting state failed. Fatal for the single check only,
    /// since its outcome cannot be trusted without successful persistence;
    /// the loop keeps running and retries next interval.
    #[error("storage failed for target {identifier}: {source}")]
    Storage {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },
}

impl WatchError {
    pub fn is_fetch(&self) -> bool {
        matches!(self, WatchError::Fetch { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, WatchError::Storage { .. })
    }
}
