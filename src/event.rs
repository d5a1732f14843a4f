//! Decoded forwarder events, as handed to the dispatcher.

use alloy_primitives::{Address, B256};

use crate::ids;

/// Where a log was emitted: contract, block and position within the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogContext {
    /// Contract that emitted the log.
    pub address: Address,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
    pub log_index: u64,
}

impl LogContext {
    /// Id of the event fact recorded for this log.
    pub fn event_id(&self) -> String {
        ids::event_id(&self.transaction_hash, self.log_index)
    }

    pub fn transaction_id(&self) -> String {
        ids::transaction_id(&self.transaction_hash)
    }
}

/// Events emitted by the forwarder contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwarderEvent {
    /// `ForwarderCreated(address forwarderAddress)`
    ForwarderCreated { forwarder_address: Address },
    /// `MetaTransactionExecuted(address from, address to)`
    MetaTransactionExecuted { from: Address, to: Address },
}

impl ForwarderEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ForwarderCreated { .. } => "ForwarderCreated",
            Self::MetaTransactionExecuted { .. } => "MetaTransactionExecuted",
        }
    }
}

/// A forwarder event together with the log it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedLog {
    pub context: LogContext,
    pub event: ForwarderEvent,
}
