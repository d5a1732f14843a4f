use std::collections::HashMap;

use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::event::LogContext;
use crate::ids;

/// Raw EVM log, enriched with the block context the host delivers it with.
///
/// Block number, timestamp and log index are read either as JSON numbers or as the hex
/// quantities `eth_getLogs` returns (`"0x1a"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    #[serde(default)]
    pub data: Bytes,
    #[serde(with = "quantity")]
    pub block_number: u64,
    #[serde(with = "quantity")]
    pub block_timestamp: u64,
    pub transaction_hash: B256,
    #[serde(with = "quantity")]
    pub log_index: u64,
    /// Set by the host when the log was dropped by a reorg.
    #[serde(default)]
    pub removed: bool,
}

impl RawLog {
    pub fn topic0(&self) -> Option<&B256> {
        self.topics.first()
    }

    pub fn context(&self) -> LogContext {
        LogContext {
            address: self.address,
            block_number: self.block_number,
            block_timestamp: self.block_timestamp,
            transaction_hash: self.transaction_hash,
            log_index: self.log_index,
        }
    }

    /// Key/value summary used in log lines.
    pub fn metadata(&self) -> HashMap<String, String> {
        let mut metadata = HashMap::new();
        metadata.insert("address".to_string(), ids::address_id(&self.address));
        metadata.insert(
            "tx_hash".to_string(),
            ids::transaction_id(&self.transaction_hash),
        );
        metadata.insert("block_number".to_string(), self.block_number.to_string());
        metadata.insert("log_index".to_string(), self.log_index.to_string());
        metadata
    }
}

mod quantity {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quantity {
        Number(u64),
        Hex(#[serde(with = "alloy_serde::quantity")] u64),
    }

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Quantity::deserialize(deserializer)? {
            Quantity::Number(value) | Quantity::Hex(value) => Ok(value),
        }
    }
}
