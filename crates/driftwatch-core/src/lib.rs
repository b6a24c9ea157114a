//! # Driftwatch Core
//!
//! Shared logic for Driftwatch: data models, content fingerprinting, the
//! [`Fetcher`] and [`StateStore`] trait seams, and the [`ChangeWatcher`]
//! itself.
//!
//! This crate contains no tokio, filesystem, network, or other native-only
//! dependencies. The watch loops, storage backends, HTTP collaborator, and
//! CLI live in the `driftwatch` application crate.

pub mod error;
pub mod fetch;
pub mod fingerprint;
pub mod models;
pub mod store;
pub mod watcher;

pub use error::WatchError;
pub use fetch::{FetchedContent, Fetcher};
pub use models::{CheckOutcome, ObservationRecord, PersistedState, WatchTarget};
pub use store::StateStore;
pub use watcher::{ChangeWatcher, CheckObserver};
