//! Torii Forwarder - indexer for meta-transaction forwarder events.
//!
//! Logs emitted by forwarder contracts are decoded into [`ForwarderEvent`]s and mapped onto a
//! small entity graph: accounts and forwarder contracts, resolved fetch-or-create, plus one
//! immutable fact per event. Every id is derived from the chain data, so replaying a log
//! rewrites nothing.
//!
//! ```text
//! JsonLogSource -> ForwarderDecoder -> dispatch -> resolver / recorder -> Store
//! ```

pub mod deployment;
pub mod dispatcher;
pub mod entities;
pub mod error;
pub mod etl;
pub mod event;
pub mod ids;
pub mod indexer;
pub mod recorder;
pub mod resolver;
pub mod store;

pub use deployment::DeploymentManifest;
pub use dispatcher::dispatch;
pub use entities::{
    Account, Entity, EntityKind, ForwarderContract, ForwarderCreated, MetaTransactionExecuted,
    Record, Transaction,
};
pub use error::{StoreError, StoreResult};
pub use etl::{ForwarderDecoder, JsonLogSource, RawLog};
pub use event::{DecodedLog, ForwarderEvent, LogContext};
pub use indexer::{IndexStats, Indexer};
pub use store::{MemoryStore, SqliteStore, Store, StoreExt};
