//! Deployment manifest for the forwarder and the token that trusts it.
//!
//! The manifest is declarative: it names the deployed contracts and their constructor
//! parameters. The indexer only reads it to learn which addresses to watch.

use std::fs;
use std::path::Path;

use alloy_primitives::Address;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

fn default_forwarder_contract() -> String {
    "Forwarder".to_string()
}

fn default_token_contract() -> String {
    "GenericTokenMeta".to_string()
}

fn default_token_name() -> String {
    "GenericERC20".to_string()
}

fn default_token_symbol() -> String {
    "GT".to_string()
}

/// Deployed forwarder contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDeployment {
    #[serde(default = "default_forwarder_contract")]
    pub contract: String,
    pub address: Address,
}

/// Token contract constructed with `(name, symbol, forwarder)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDeployment {
    #[serde(default = "default_token_contract")]
    pub contract: String,
    #[serde(default = "default_token_name")]
    pub name: String,
    #[serde(default = "default_token_symbol")]
    pub symbol: String,
    /// Trusted forwarder passed to the token constructor.
    pub forwarder: Address,
    /// Absent until the token is deployed.
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentManifest {
    pub forwarder: ContractDeployment,
    #[serde(default)]
    pub token: Option<TokenDeployment>,
}

impl DeploymentManifest {
    /// Load and validate a manifest file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        let manifest = Self::from_json(&contents)
            .with_context(|| format!("invalid manifest: {}", path.display()))?;

        tracing::info!(
            target: "torii_forwarder::deployment",
            path = %path.display(),
            forwarder = %manifest.forwarder.address,
            token = manifest.token.as_ref().map(|t| t.symbol.as_str()),
            "Loaded deployment manifest"
        );
        Ok(manifest)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let manifest: Self =
            serde_json::from_str(contents).context("failed to parse deployment manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// The token must trust the forwarder deployed alongside it.
    pub fn validate(&self) -> Result<()> {
        if let Some(token) = &self.token {
            if token.forwarder != self.forwarder.address {
                bail!(
                    "token {} trusts forwarder {}, but the deployed forwarder is {}",
                    token.symbol,
                    token.forwarder,
                    self.forwarder.address
                );
            }
        }
        Ok(())
    }

    /// Contracts whose logs the indexer decodes.
    pub fn watched_addresses(&self) -> Vec<Address> {
        vec![self.forwarder.address]
    }
}
