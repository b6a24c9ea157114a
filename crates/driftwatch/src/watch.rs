//! Watch loops: per-target scheduling, cancellation, failure isolation.
//!
//! One independent task runs per target. A task suspends at exactly two
//! points, while awaiting the fetch and while sleeping out the interval, and
//! both observe the shared cancellation token. Because each target is one
//! sequential loop, per-identifier writes are serialized by construction.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use driftwatch_core::models::WatchTarget;
use driftwatch_core::watcher::{ChangeWatcher, CheckObserver};

/// Scheduling options for the watch loops.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Fixed wait between the end of one check and the start of the next.
    /// Drift from slow fetches is expected; this is not a fixed-rate
    /// scheduler.
    pub interval: Duration,
    /// Upper bound on a single observer callback. A slower observer is
    /// abandoned for that check so it cannot stall the loop.
    pub observer_timeout: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            observer_timeout: Duration::from_secs(10),
        }
    }
}

async fn notify<F>(limit: Duration, address: &str, callback: F)
where
    F: Future<Output = ()>,
{
    if timeout(limit, callback).await.is_err() {
        tracing::warn!(address, "observer callback timed out");
    }
}

/// Watch a single target until the token is cancelled.
///
/// Failures do not terminate the loop: they are reported to the observer and
/// the next check runs after the normal interval, with no backoff.
/// Cancellation during a fetch drops the in-flight request; cancellation
/// during the sleep wakes immediately. Termination is reported via
/// `on_cancelled`.
pub async fn watch_loop(
    watcher: ChangeWatcher,
    target: WatchTarget,
    options: WatchOptions,
    observer: Arc<dyn CheckObserver>,
    cancel: CancellationToken,
) {
    tracing::info!(
        address = %target.address,
        interval_secs = options.interval.as_secs(),
        "watch loop started"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            result = watcher.check_once(&target) => match result {
                Ok(outcome) => {
                    notify(
                        options.observer_timeout,
                        &target.address,
                        observer.on_check(&target, &outcome),
                    )
                    .await;
                }
                Err(error) => {
                    tracing::warn!(address = %target.address, %error, "check failed");
                    notify(
                        options.observer_timeout,
                        &target.address,
                        observer.on_error(&target, &error),
                    )
                    .await;
                }
            },
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(options.interval) => {}
        }
    }

    notify(
        options.observer_timeout,
        &target.address,
        observer.on_cancelled(&target),
    )
    .await;
    tracing::info!(address = %target.address, "watch loop stopped");
}

/// Watch every target concurrently, one independent loop per target.
///
/// All loops share the cancellation token. A target whose checks keep
/// failing only affects itself; sibling loops continue unharmed. Returns
/// once every loop has terminated.
pub async fn watch_many(
    watcher: ChangeWatcher,
    targets: Vec<WatchTarget>,
    options: WatchOptions,
    observer: Arc<dyn CheckObserver>,
    cancel: CancellationToken,
) {
    let mut tasks = JoinSet::new();

    for target in targets {
        let watcher = watcher.clone();
        let options = options.clone();
        let observer = observer.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move {
            watch_loop(watcher, target, options, observer, cancel).await;
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(error) = joined {
            tracing::error!(%error, "watch task aborted");
        }
    }
}
