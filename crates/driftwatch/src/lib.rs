//! # Driftwatch
//!
//! **Watch web resources for content changes, with durable state and
//! append-only history.**
//!
//! Driftwatch repeatedly fetches each configured target through a pluggable
//! collaborator, fingerprints the content with SHA-256, compares against the
//! last persisted fingerprint, persists the new state, and reports every
//! check to an observer.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────────┐   ┌─────────────────┐
//! │  Fetcher  │──▶│ ChangeWatcher │──▶│   StateStore    │
//! │ HTTP/file │   │ hash+compare  │   │ JSON / SQLite   │
//! └───────────┘   └──────┬────────┘   └─────────────────┘
//!                        │
//!                        ▼
//!                 ┌──────────────┐
//!                 │ CheckObserver│
//!                 │ console/logs │
//!                 └──────────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. A **watch loop** ([`watch`]) runs one independent task per target,
//!    sleeping a fixed interval between the end of one check and the start
//!    of the next.
//! 2. Each check fetches content via the [`Fetcher`](driftwatch_core::fetch::Fetcher)
//!    collaborator ([`fetch`] provides the HTTP implementation).
//! 3. The [`ChangeWatcher`](driftwatch_core::watcher::ChangeWatcher)
//!    fingerprints the content, compares it with the last persisted state,
//!    and writes a new latest-state record plus a history entry.
//! 4. Storage goes through the
//!    [`StateStore`](driftwatch_core::store::StateStore) seam: flat JSON
//!    files ([`json_store`]) or SQLite ([`sqlite_store`]).
//! 5. Outcomes and failures are reported through the observer ([`report`]).
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`fetch`] | HTTP fetch collaborator (reqwest, plus `file://` reads) |
//! | [`json_store`] | Flat-file store: `<id>_latest.json` + `<id>_history.jsonl` |
//! | [`migrate`] | SQLite schema creation (idempotent) |
//! | [`report`] | Console observer for the CLI |
//! | [`sqlite_store`] | SQLite-backed `StateStore` |
//! | [`watch`] | Per-target watch loops, cancellation, failure isolation |

pub mod config;
pub mod db;
pub mod fetch;
pub mod json_store;
pub mod migrate;
pub mod report;
pub mod sqlite_store;
pub mod watch;

pub use driftwatch_core::{
    ChangeWatcher, CheckObserver, CheckOutcome, FetchedContent, Fetcher, ObservationRecord,
    PersistedState, StateStore, WatchError, WatchTarget,
};
