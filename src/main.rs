// ------------------------------------------------------------
// Module declarations
// ------------------------------------------------------------
//
// Each module represents a well-defined responsibility:
//
// - config:     Configuration built once from the environment
// - error:      Provider / storage / config error types
// - schema:     Transient data model and run counters
// - window:     Trailing time window
// - classify:   Log category detection by file name
// - util:       Keys, record counting, compression, time helpers
// - providers:  Control-plane and object-storage adapters
// - collector:  The collection pass itself
//
mod classify;
mod collector;
mod config;
mod error;
mod providers;
mod schema;
mod util;
mod window;

// ------------------------------------------------------------
// External dependencies
// ------------------------------------------------------------

use aws_config::BehaviorVersion;
use chrono::Utc;
use log::info;

use collector::runner::run_collection;
use config::Config;
use providers::{get_storage, rds::RdsLogProvider};

// ------------------------------------------------------------
// Application entry point
// ------------------------------------------------------------
//
// One invocation = one collection pass. Meant to be started by
// a scheduler (cron, EventBridge, ...) every hour; nothing is
// carried between runs.
//
// Responsibilities:
// - Initialize logging
// - Load configuration
// - Build the AWS clients
// - Run the collector once and print the invocation result
//
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --------------------------------------------------------
    // Configuration errors abort before any remote call
    // --------------------------------------------------------
    let config = Config::from_env()?;

    // --------------------------------------------------------
    // Region and credentials come from the standard AWS chain
    // --------------------------------------------------------
    let sdk = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let provider = RdsLogProvider::new(&sdk);
    let storage = get_storage(&config, &sdk);

    info!(
        "Collecting logs of {}* instances into s3://{}/{}/",
        config.instance_prefix, config.bucket, config.key_prefix
    );

    // --------------------------------------------------------
    // Only instance enumeration can fail the run. Per-instance
    // and per-file failures are logged inside the runner and
    // still end in a 200 result.
    // --------------------------------------------------------
    let summary = run_collection(&config, &provider, storage.as_ref(), Utc::now()).await?;

    let result = summary.into_result();
    println!("{}", serde_json::to_string(&result)?);

    Ok(())
}
