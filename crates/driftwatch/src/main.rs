//! # Driftwatch CLI (`drift`)
//!
//! The `drift` binary watches web resources for content changes. It fetches
//! each target, fingerprints the content with SHA-256, compares against the
//! last persisted state, and records every check in an append-only history.
//!
//! ## Usage
//!
//! ```bash
//! drift --config ./config/drift.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `drift init` | Create the storage directory or SQLite schema |
//! | `drift targets` | List configured targets and their identifiers |
//! | `drift check [ADDRESS]` | Run a single check for one target, or all |
//! | `drift watch` | Watch all targets until interrupted |
//! | `drift latest [ADDRESS]` | Show the latest persisted state |
//! | `drift history ADDRESS` | Show history records, oldest first |
//!
//! ## Examples
//!
//! ```bash
//! # Create storage
//! drift init --config ./config/drift.toml
//!
//! # One-shot check of every configured target
//! drift check
//!
//! # Watch continuously (Ctrl-C to stop)
//! drift watch
//!
//! # Inspect what has been recorded
//! drift latest https://news.ycombinator.com
//! drift history https://news.ycombinator.com --limit 20
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use driftwatch::config::{load_config, Config};
use driftwatch::fetch::HttpFetcher;
use driftwatch::json_store::JsonFileStore;
use driftwatch::report::{describe_outcome, short, ConsoleObserver};
use driftwatch::sqlite_store::SqliteStore;
use driftwatch::watch::{watch_many, WatchOptions};
use driftwatch_core::models::WatchTarget;
use driftwatch_core::store::StateStore;
use driftwatch_core::watcher::ChangeWatcher;

/// Driftwatch: watch web resources for content changes, with durable state
/// and append-only history.
#[derive(Parser)]
#[command(
    name = "drift",
    about = "Watch web resources for content changes, with durable state and history",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/drift.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize storage.
    ///
    /// Creates the storage directory (JSON backend) or the SQLite database
    /// and schema. Idempotent; running it multiple times is safe.
    Init,

    /// List configured targets and their identifiers.
    Targets,

    /// Run a single check for one target, or for all configured targets.
    ///
    /// An address that is not in the config is checked ad hoc with an empty
    /// extraction spec.
    Check {
        /// Target address. Omit to check every configured target.
        address: Option<String>,
    },

    /// Watch all configured targets until interrupted.
    ///
    /// Runs one independent loop per target at the configured interval.
    /// Ctrl-C stops all loops cleanly.
    Watch,

    /// Show the latest persisted state for one target, or for all.
    Latest {
        address: Option<String>,
    },

    /// Show history records for a target, oldest first.
    History {
        address: String,

        /// Show only the most recent N records.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Init => cmd_init(&config).await,
        Commands::Targets => cmd_targets(&config),
        Commands::Check { address } => cmd_check(&config, address).await,
        Commands::Watch => cmd_watch(&config).await,
        Commands::Latest { address } => cmd_latest(&config, address).await,
        Commands::History { address, limit } => cmd_history(&config, &address, limit).await,
    }
}

async fn open_store(config: &Config) -> Result<Arc<dyn StateStore>> {
    match config.storage.backend.as_str() {
        "json" => Ok(Arc::new(JsonFileStore::open(&config.storage.path)?)),
        "sqlite" => Ok(Arc::new(SqliteStore::connect(&config.storage.path).await?)),
        other => bail!("Unknown storage backend: '{}'", other),
    }
}

fn build_watcher(config: &Config, store: Arc<dyn StateStore>) -> Result<ChangeWatcher> {
    let fetcher = HttpFetcher::new(config.watch.fetch_timeout(), &config.watch.user_agent)?;
    Ok(ChangeWatcher::new(Arc::new(fetcher), store))
}

/// One address names one target (configured or ad hoc); no address means all
/// configured targets.
fn resolve_targets(config: &Config, address: Option<String>) -> Vec<WatchTarget> {
    match address {
        Some(addr) => match config.targets.iter().find(|t| t.address == addr) {
            Some(t) => vec![WatchTarget::new(&t.address, &t.extract)],
            None => vec![WatchTarget::new(addr, "")],
        },
        None => config.watch_targets(),
    }
}

async fn cmd_init(config: &Config) -> Result<()> {
    open_store(config).await?;
    println!(
        "initialized {} storage at {}",
        config.storage.backend,
        config.storage.path.display()
    );
    Ok(())
}

fn cmd_targets(config: &Config) -> Result<()> {
    if config.targets.is_empty() {
        println!("No targets configured.");
        return Ok(());
    }

    println!("{:<18} {:<40} EXTRACT", "IDENTIFIER", "ADDRESS");
    for target in config.watch_targets() {
        println!(
            "{:<18} {:<40} {}",
            target.identifier(),
            target.address,
            target.extraction_spec
        );
    }
    Ok(())
}

async fn cmd_check(config: &Config, address: Option<String>) -> Result<()> {
    let targets = resolve_targets(config, address);
    if targets.is_empty() {
        bail!("No targets configured. Add [[targets]] entries to the config file.");
    }

    let store = open_store(config).await?;
    let watcher = build_watcher(config, store)?;

    let mut failed = 0usize;
    for target in &targets {
        match watcher.check_once(target).await {
            Ok(outcome) => println!("{} {}", target.address, describe_outcome(&outcome)),
            Err(error) => {
                eprintln!("{} error: {:#}", target.address, error);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} checks failed", failed, targets.len());
    }
    println!("ok");
    Ok(())
}

async fn cmd_watch(config: &Config) -> Result<()> {
    let targets = config.watch_targets();
    if targets.is_empty() {
        bail!("No targets configured. Add [[targets]] entries to the config file.");
    }

    let store = open_store(config).await?;
    let watcher = build_watcher(config, store)?;

    let options = WatchOptions {
        interval: config.watch.interval(),
        observer_timeout: config.watch.observer_timeout(),
    };

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping watch loops");
            handler_token.cancel();
        }
    });

    println!(
        "watching {} target(s) every {}s (Ctrl-C to stop)",
        targets.len(),
        config.watch.interval_secs
    );

    watch_many(watcher, targets, options, Arc::new(ConsoleObserver), cancel).await;

    println!("stopped");
    Ok(())
}

async fn cmd_latest(config: &Config, address: Option<String>) -> Result<()> {
    let targets = resolve_targets(config, address);
    if targets.is_empty() {
        bail!("No targets configured. Add [[targets]] entries to the config file.");
    }

    let store = open_store(config).await?;

    for target in &targets {
        match store.load_latest(&target.identifier()).await? {
            Some(state) => {
                println!("{}", state.address);
                println!("  checked_at:     {}", state.record.checked_at.to_rfc3339());
                println!("  fingerprint:    {}", state.record.fingerprint);
                println!("  content_length: {}", state.record.content_length);
            }
            None => println!("{} no state recorded", target.address),
        }
    }
    Ok(())
}

async fn cmd_history(config: &Config, address: &str, limit: Option<usize>) -> Result<()> {
    let store = open_store(config).await?;
    let target = match config.targets.iter().find(|t| t.address == address) {
        Some(t) => WatchTarget::new(&t.address, &t.extract),
        None => WatchTarget::new(address, ""),
    };

    let mut history = store.load_history(&target.identifier()).await?;
    let total = history.len();
    if let Some(n) = limit {
        if n < history.len() {
            history.drain(..history.len() - n);
        }
    }

    if history.is_empty() {
        println!("{} no history recorded", target.address);
        return Ok(());
    }

    println!("{:<26} {:<18} BYTES", "CHECKED_AT", "FINGERPRINT");
    for record in &history {
        println!(
            "{:<26} {:<18} {}",
            record.checked_at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            short(&record.fingerprint),
            record.content_length
        );
    }
    println!("{} of {} record(s)", history.len(), total);
    Ok(())
}
