//! Forwarder event decoder (ForwarderCreated + MetaTransactionExecuted)

use std::collections::HashSet;

use alloy_primitives::{Address, B256};
use alloy_sol_types::{sol, SolEvent};

use super::log::RawLog;
use crate::event::{DecodedLog, ForwarderEvent};

sol! {
    event ForwarderCreated(address forwarderAddress);
    event MetaTransactionExecuted(address from, address to);
}

/// Size of one ABI word in log data.
const WORD: usize = 32;

const ADDRESS_LEN: usize = 20;

/// Forwarder event decoder
///
/// Recognizes logs by `topic0` and decodes:
/// - ForwarderCreated(forwarderAddress)
/// - MetaTransactionExecuted(from, to)
///
/// Deployed forwarders do not all agree on which parameters are indexed, so each event
/// accepts every split of its address parameters between topics and data. Logs with any
/// other shape are skipped with a warning.
#[derive(Debug, Clone, Default)]
pub struct ForwarderDecoder {
    /// Contracts to decode; empty means every emitter.
    contracts: HashSet<Address>,
}

impl ForwarderDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict decoding to logs emitted by the given contracts.
    pub fn with_contracts(mut self, contracts: impl IntoIterator<Item = Address>) -> Self {
        self.contracts.extend(contracts);
        self
    }

    pub fn decoder_name(&self) -> &str {
        "forwarder"
    }

    /// ForwarderCreated event signature hash.
    pub fn forwarder_created_selector() -> B256 {
        ForwarderCreated::SIGNATURE_HASH
    }

    /// MetaTransactionExecuted event signature hash.
    pub fn meta_transaction_executed_selector() -> B256 {
        MetaTransactionExecuted::SIGNATURE_HASH
    }

    fn is_interested(&self, log: &RawLog) -> bool {
        !log.removed && (self.contracts.is_empty() || self.contracts.contains(&log.address))
    }

    /// Decode a single log, `None` if it is not a (well-formed) forwarder event.
    pub fn decode_log(&self, log: &RawLog) -> Option<DecodedLog> {
        if !self.is_interested(log) {
            return None;
        }

        let selector = log.topic0()?;
        let event = if *selector == Self::forwarder_created_selector() {
            decode_forwarder_created(log)
        } else if *selector == Self::meta_transaction_executed_selector() {
            decode_meta_transaction_executed(log)
        } else {
            return None;
        };

        if event.is_none() {
            tracing::warn!(
                target: "torii_forwarder::decoder",
                selector = %selector,
                metadata = ?log.metadata(),
                topics_len = log.topics.len(),
                data_len = log.data.len(),
                "Malformed forwarder event"
            );
        }

        event.map(|event| DecodedLog {
            context: log.context(),
            event,
        })
    }

    /// Decode a batch of logs, keeping their order.
    pub fn decode(&self, logs: &[RawLog]) -> Vec<DecodedLog> {
        logs.iter().filter_map(|log| self.decode_log(log)).collect()
    }
}

/// Read `count` address parameters: indexed ones from `topics[1..]`, the rest from data words.
fn address_params(log: &RawLog, count: usize) -> Option<Vec<Address>> {
    let indexed = log.topics.len().checked_sub(1)?;
    if indexed > count || log.data.len() != (count - indexed) * WORD {
        return None;
    }

    let from_topics = log.topics[1..].iter().map(|topic| word_to_address(topic.as_slice()));
    let from_data = log.data.chunks_exact(WORD).map(word_to_address);
    from_topics.chain(from_data).collect()
}

/// ABI-decode an address word, rejecting dirty upper bytes.
fn word_to_address(word: &[u8]) -> Option<Address> {
    let (padding, address) = word.split_at(WORD - ADDRESS_LEN);
    padding
        .iter()
        .all(|byte| *byte == 0)
        .then(|| Address::from_slice(address))
}

fn decode_forwarder_created(log: &RawLog) -> Option<ForwarderEvent> {
    let params = address_params(log, 1)?;
    Some(ForwarderEvent::ForwarderCreated {
        forwarder_address: params[0],
    })
}

fn decode_meta_transaction_executed(log: &RawLog) -> Option<ForwarderEvent> {
    let params = address_params(log, 2)?;
    Some(ForwarderEvent::MetaTransactionExecuted {
        from: params[0],
        to: params[1],
    })
}
