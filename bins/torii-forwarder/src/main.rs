//! Torii Forwarder - meta-transaction forwarder indexer
//!
//! Replays captured forwarder logs into a SQLite entity store. Replaying the same file
//! again is safe: every entity id is derived from the chain data.
//!
//! # Usage
//!
//! ```bash
//! # Index every forwarder event in the file
//! torii-forwarder --logs ./logs.json
//!
//! # Only the forwarder from a deployment manifest
//! torii-forwarder --logs ./logs.json --manifest ./deployment.json
//!
//! # Specific contracts, custom database
//! torii-forwarder --logs ./logs.json --contracts 0x123...,0x456... --db-path ./fw.db
//! ```

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use torii_forwarder::{DeploymentManifest, ForwarderDecoder, Indexer, JsonLogSource, SqliteStore};

fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .init();

    tracing::info!("Starting Torii Forwarder Indexer");
    tracing::info!("Logs: {}", config.logs.display());
    tracing::info!("Database: {}", config.db_path.display());

    let mut contracts = config.parse_contracts()?;
    if let Some(path) = &config.manifest {
        let manifest = DeploymentManifest::from_path(path)?;
        contracts.extend(manifest.watched_addresses());
    }

    if contracts.is_empty() {
        tracing::info!("No contracts configured: decoding logs from every emitter");
    }
    for address in &contracts {
        tracing::info!("Watching forwarder {}", address);
    }

    let decoder = ForwarderDecoder::new().with_contracts(contracts);
    let source = JsonLogSource::from_path(&config.logs)?;
    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("failed to open database: {}", config.db_path.display()))?;

    let mut indexer = Indexer::new(store, decoder);
    let stats = indexer.process(&source.into_logs())?;

    let store = indexer.into_store();
    tracing::info!("Final Statistics:");
    tracing::info!("  Logs read: {}", stats.logs);
    tracing::info!("  Events indexed: {}", stats.decoded);
    tracing::info!("  Logs skipped: {}", stats.skipped);
    for (kind, count) in store.kind_counts()? {
        tracing::info!("  {}: {}", kind, count);
    }

    Ok(())
}
