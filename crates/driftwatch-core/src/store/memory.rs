//! In-memory [`StateStore`] implementation for testing.
//!
//! Uses `HashMap`s behind `std::sync::RwLock` for thread safety. Nothing is
//! durable; state lives as long as the store value.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ObservationRecord, PersistedState};

use super::StateStore;

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct InMemoryStore {
    latest: RwLock<HashMap<String, PersistedState>>,
    history: RwLock<HashMap<String, Vec<ObservationRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    async fn load_latest(&self, identifier: &str) -> Result<Option<PersistedState>> {
        Ok(self.latest.read().unwrap().get(identifier).cloned())
    }

    async fn save_latest(&self, identifier: &str, state: &PersistedState) -> Result<()> {
        self.latest
            .write()
            .unwrap()
            .insert(identifier.to_string(), state.clone());
        Ok(())
    }

    async fn append_history(&self, identifier: &str, record: &ObservationRecord) -> Result<()> {
        self.history
            .write()
            .unwrap()
            .entry(identifier.to_string())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn load_history(&self, identifier: &str) -> Result<Vec<ObservationRecord>> {
        Ok(self
            .history
            .read()
            .unwrap()
            .get(identifier)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record(fingerprint: &str) -> ObservationRecord {
        ObservationRecord {
            checked_at: Utc::now(),
            fingerprint: fingerprint.to_string(),
            content_length: 5,
            summary: "hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_latest_absent() {
        let store = InMemoryStore::new();
        assert!(store.load_latest("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_latest_overwrites() {
        let store = InMemoryStore::new();
        let first = PersistedState {
            address: "https://x.test/a".to_string(),
            record: record("aaa"),
        };
        let second = PersistedState {
            address: "https://x.test/a".to_string(),
            record: record("bbb"),
        };

        store.save_latest("abc", &first).await.unwrap();
        store.save_latest("abc", &second).await.unwrap();

        let loaded = store.load_latest("abc").await.unwrap().unwrap();
        assert_eq!(loaded.record.fingerprint, "bbb");
    }

    #[tokio::test]
    async fn test_history_appends_in_order() {
        let store = InMemoryStore::new();
        store.append_history("abc", &record("aaa")).await.unwrap();
        store.append_history("abc", &record("bbb")).await.unwrap();

        let history = store.load_history("abc").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].fingerprint, "aaa");
        assert_eq!(history[1].fingerprint, "bbb");
    }

    #[tokio::test]
    async fn test_identifiers_are_isolated() {
        let store = InMemoryStore::new();
        store.append_history("abc", &record("aaa")).await.unwrap();

        assert!(store.load_history("def").await.unwrap().is_empty());
        assert!(store.load_latest("def").await.unwrap().is_none());
    }
}
