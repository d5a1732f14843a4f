//! Routes decoded forwarder events to their handlers.
//!
//! The dispatcher is stateless. For every event it first resolves all entities the fact will
//! reference (the emitting forwarder, the involved accounts and the transaction) and only then
//! records the fact, so the store never holds a fact pointing at a missing entity.

use crate::entities::Entity;
use crate::error::StoreResult;
use crate::event::{DecodedLog, ForwarderEvent};
use crate::recorder::{log_transaction, record_forwarder_created, record_meta_transaction_executed};
use crate::resolver::{fetch_account, fetch_forwarder};
use crate::store::Store;

/// Apply one decoded log to the store and return the recorded fact.
///
/// Callers must deliver logs one at a time in chain order. On error the whole log can be
/// dispatched again: every write issued here is idempotent.
pub fn dispatch<S: Store + ?Sized>(store: &mut S, log: &DecodedLog) -> StoreResult<Entity> {
    let context = &log.context;
    let contract = fetch_forwarder(store, &context.address)?;

    let fact: Entity = match log.event {
        ForwarderEvent::ForwarderCreated { forwarder_address } => {
            fetch_account(store, &forwarder_address)?;
            let transaction = log_transaction(store, context)?;
            record_forwarder_created(store, context, &contract, &transaction, forwarder_address)?
                .into()
        }
        ForwarderEvent::MetaTransactionExecuted { from, to } => {
            fetch_account(store, &from)?;
            fetch_account(store, &to)?;
            let transaction = log_transaction(store, context)?;
            record_meta_transaction_executed(store, context, &contract, &transaction, from, to)?
                .into()
        }
    };

    tracing::debug!(
        target: "torii_forwarder::dispatcher",
        event = log.event.name(),
        id = fact.id(),
        contract = %contract.id,
        block_number = context.block_number,
        "Dispatched event"
    );
    Ok(fact)
}
