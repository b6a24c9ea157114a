//! Flat-file [`StateStore`].
//!
//! One directory holds all targets; per identifier there are two files:
//! `<identifier>_latest.json` (latest state, pretty-printed) and
//! `<identifier>_history.jsonl` (one record per line, append-only). Both
//! stay human-readable so state can be inspected with ordinary tools.
//!
//! The latest file is replaced by writing a sibling temp file and renaming
//! it over the target. Rename is atomic on the same filesystem, so a crash
//! mid-write leaves the previous valid file intact and a concurrent reader
//! never sees a torn state.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use driftwatch_core::models::{ObservationRecord, PersistedState};
use driftwatch_core::store::StateStore;

/// File-backed store rooted at one directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create storage directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn latest_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{identifier}_latest.json"))
    }

    fn history_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{identifier}_history.jsonl"))
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load_latest(&self, identifier: &str) -> Result<Option<PersistedState>> {
        let path = self.latest_path(identifier);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let state = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(state))
    }

    async fn save_latest(&self, identifier: &str, state: &PersistedState) -> Result<()> {
        let path = self.latest_path(identifier);
        let tmp = self.dir.join(format!("{identifier}_latest.json.tmp"));
        let data = serde_json::to_string_pretty(state)?;
        fs::write(&tmp, data).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    async fn append_history(&self, identifier: &str, record: &ObservationRecord) -> Result<()> {
        let path = self.history_path(identifier);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}").with_context(|| format!("Failed to append {}", path.display()))?;
        Ok(())
    }

    async fn load_history(&self, identifier: &str) -> Result<Vec<ObservationRecord>> {
        let path = self.history_path(identifier);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        // A torn final line can survive a crash mid-append; skip what does
        // not parse instead of failing the whole read.
        let records = data
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "skipping unreadable history line");
                    None
                }
            })
            .collect();
        Ok(records)
    }
}
