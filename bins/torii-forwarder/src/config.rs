//! Configuration for the forwarder indexer

use std::path::PathBuf;
use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::Parser;

/// Meta-transaction forwarder indexer
///
/// Replays forwarder logs from a JSON file into a SQLite entity store.
#[derive(Parser, Debug)]
#[command(name = "torii-forwarder")]
#[command(about = "Index meta-transaction forwarder events", long_about = None)]
pub struct Config {
    /// JSON file with raw logs (bare array or `{"logs": [...]}`)
    #[arg(long)]
    pub logs: PathBuf,

    /// Database path for indexed entities
    #[arg(long, env = "FORWARDER_INDEXER_DB", default_value = "./forwarder-data.db")]
    pub db_path: PathBuf,

    /// Deployment manifest; its forwarder address is watched
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Explicitly watched forwarder contracts (comma-separated hex addresses)
    ///
    /// Example: --contracts 0x123...,0x456...
    /// With neither this nor --manifest, logs from every contract are decoded.
    #[arg(long, value_delimiter = ',')]
    pub contracts: Vec<String>,
}

impl Config {
    /// Parse explicitly configured contracts from CLI args
    pub fn parse_contracts(&self) -> Result<Vec<Address>> {
        self.contracts
            .iter()
            .map(|s| {
                Address::from_str(s.trim())
                    .with_context(|| format!("invalid contract address '{s}'"))
            })
            .collect()
    }
}
