//! Console reporting for the CLI.

use async_trait::async_trait;

use driftwatch_core::error::WatchError;
use driftwatch_core::models::{CheckOutcome, WatchTarget};
use driftwatch_core::watcher::CheckObserver;

/// Prints one line per check, mirroring the one-shot `check` output.
pub struct ConsoleObserver;

#[async_trait]
impl CheckObserver for ConsoleObserver {
    async fn on_check(&self, target: &WatchTarget, outcome: &CheckOutcome) {
        println!(
            "[{}] {} {}",
            now(),
            target.address,
            describe_outcome(outcome)
        );
    }

    async fn on_error(&self, target: &WatchTarget, error: &WatchError) {
        eprintln!("[{}] {} error: {:#}", now(), target.address, error);
    }

    async fn on_cancelled(&self, target: &WatchTarget) {
        println!("[{}] {} stopped", now(), target.address);
    }
}

/// One-line human description of a check outcome.
pub fn describe_outcome(outcome: &CheckOutcome) -> String {
    if outcome.first_observation {
        format!(
            "baseline saved ({}, {} bytes)",
            short(&outcome.current_fingerprint),
            outcome.record.content_length
        )
    } else if outcome.changed {
        format!(
            "changed {} -> {} ({} bytes)",
            outcome
                .previous_fingerprint
                .as_deref()
                .map(short)
                .unwrap_or("?"),
            short(&outcome.current_fingerprint),
            outcome.record.content_length
        )
    } else {
        "unchanged".to_string()
    }
}

/// First 16 hex chars, enough to eyeball a fingerprint.
pub fn short(fingerprint: &str) -> &str {
    &fingerprint[..fingerprint.len().min(16)]
}

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
