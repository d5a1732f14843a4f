//! Deterministic identifiers for indexed entities.
//!
//! Every id is a pure function of on-chain data:
//! - accounts and forwarder contracts: the address, as lowercase `0x` hex
//! - transactions: the transaction hash, as lowercase `0x` hex
//! - event facts: `<transaction hash>-<log index>`
//!
//! Re-deriving an id for the same input always yields the same string, which is
//! what makes replaying a log safe.

use alloy_primitives::{Address, B256};

/// Canonical id of an account or forwarder contract.
pub fn address_id(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Canonical id of a transaction.
pub fn transaction_id(transaction_hash: &B256) -> String {
    format!("0x{}", hex::encode(transaction_hash.as_slice()))
}

/// Id of the event fact emitted at `log_index` within a transaction.
pub fn event_id(transaction_hash: &B256, log_index: u64) -> String {
    format!("{}-{}", transaction_id(transaction_hash), log_index)
}

/// Serde adapter storing addresses as canonical lowercase hex.
///
/// Deserialization accepts any casing, so checksummed input maps to the same bytes.
pub mod hex_address {
    use std::str::FromStr;

    use alloy_primitives::Address;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::address_id(address))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Address::from_str(&raw).map_err(D::Error::custom)
    }
}
