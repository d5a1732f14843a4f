//! Drives raw logs through decoding and dispatch into a store.

use serde::Serialize;

use crate::dispatcher::dispatch;
use crate::entities::{Entity, EntityKind};
use crate::error::StoreResult;
use crate::etl::{ForwarderDecoder, RawLog};
use crate::store::Store;

/// Indexing statistics for one processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub logs: usize,
    pub decoded: usize,
    pub skipped: usize,
    pub forwarders_created: usize,
    pub meta_transactions: usize,
}

impl IndexStats {
    fn record(&mut self, fact: &Entity) {
        match fact.kind() {
            EntityKind::ForwarderCreated => self.forwarders_created += 1,
            EntityKind::MetaTransactionExecuted => self.meta_transactions += 1,
            _ => {}
        }
    }
}

/// Owns a store and feeds it decoded forwarder events, one log at a time.
pub struct Indexer<S: Store> {
    store: S,
    decoder: ForwarderDecoder,
}

impl<S: Store> Indexer<S> {
    pub fn new(store: S, decoder: ForwarderDecoder) -> Self {
        Self { store, decoder }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Decode and dispatch one log. Returns the recorded fact, `None` if the log was skipped.
    pub fn process_log(&mut self, log: &RawLog) -> StoreResult<Option<Entity>> {
        match self.decoder.decode_log(log) {
            Some(decoded) => dispatch(&mut self.store, &decoded).map(Some),
            None => Ok(None),
        }
    }

    /// Process logs in the given order.
    ///
    /// Stops at the first store failure. Everything written before it stays, and the whole
    /// batch can be processed again.
    pub fn process(&mut self, logs: &[RawLog]) -> StoreResult<IndexStats> {
        let mut stats = IndexStats {
            logs: logs.len(),
            ..IndexStats::default()
        };

        for log in logs {
            match self.process_log(log)? {
                Some(fact) => {
                    stats.decoded += 1;
                    stats.record(&fact);
                }
                None => stats.skipped += 1,
            }
        }

        tracing::info!(
            target: "torii_forwarder::indexer",
            decoder = self.decoder.decoder_name(),
            logs = stats.logs,
            decoded = stats.decoded,
            skipped = stats.skipped,
            forwarders_created = stats.forwarders_created,
            meta_transactions = stats.meta_transactions,
            "Processed batch"
        );
        Ok(stats)
    }
}
