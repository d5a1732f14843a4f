//! JSON file-based log source.
//!
//! Replays captured logs from a JSON file, for backfills and tests that should not depend on
//! a live node.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::log::RawLog;

/// Wrapper struct to support both JSON formats.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LogsFileFormat {
    /// Direct array of logs: `[{...}, {...}]`
    DirectArray(Vec<RawLog>),
    /// Object with logs key: `{"chainId": 1, "logs": [{...}]}`
    WithMetadata { logs: Vec<RawLog> },
}

/// Log source backed by a JSON file.
///
/// Logs are served in chain order (block number, then log index) whatever their order in
/// the file, since the dispatcher relies on the host delivering them that way.
#[derive(Debug, Clone)]
pub struct JsonLogSource {
    logs: Vec<RawLog>,
}

impl JsonLogSource {
    /// Load logs from the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        tracing::info!(
            target: "torii_forwarder::extractor",
            path = %path.display(),
            "Loading logs from JSON file"
        );

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read file: {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Parse logs from a JSON document.
    pub fn from_json(contents: &str) -> Result<Self> {
        let mut logs = match serde_json::from_str::<LogsFileFormat>(contents)
            .context("failed to parse JSON logs")?
        {
            LogsFileFormat::DirectArray(logs) => logs,
            LogsFileFormat::WithMetadata { logs } => logs,
        };
        logs.sort_by_key(|log| (log.block_number, log.log_index));

        tracing::info!(
            target: "torii_forwarder::extractor",
            total_logs = logs.len(),
            "Loaded logs"
        );

        Ok(Self { logs })
    }

    pub fn logs(&self) -> &[RawLog] {
        &self.logs
    }

    pub fn into_logs(self) -> Vec<RawLog> {
        self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}
