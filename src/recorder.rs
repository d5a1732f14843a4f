//! Recording of immutable event facts.
//!
//! Each call persists at most one new fact whose id is derived from the log. A fact that is
//! already stored is never overwritten, so replaying a log leaves the stored bytes untouched.

use alloy_primitives::Address;

use crate::entities::{
    ForwarderContract, ForwarderCreated, MetaTransactionExecuted, Record, Transaction,
};
use crate::error::StoreResult;
use crate::event::LogContext;
use crate::store::{Store, StoreExt};

/// Fetch-or-create the transaction record referenced by facts of this log.
pub fn log_transaction<S: Store + ?Sized>(
    store: &mut S,
    context: &LogContext,
) -> StoreResult<Transaction> {
    let id = context.transaction_id();
    if let Some(transaction) = store.get::<Transaction>(&id)? {
        return Ok(transaction);
    }

    let transaction = Transaction {
        id,
        timestamp: context.block_timestamp,
        block_number: context.block_number,
    };
    store.put(transaction.clone())?;
    Ok(transaction)
}

/// Record a `ForwarderCreated` fact.
///
/// `forwarder_address` is the address announced by the event, which is not necessarily the
/// contract that emitted it.
pub fn record_forwarder_created<S: Store + ?Sized>(
    store: &mut S,
    context: &LogContext,
    contract: &ForwarderContract,
    transaction: &Transaction,
    forwarder_address: Address,
) -> StoreResult<ForwarderCreated> {
    let fact = ForwarderCreated {
        id: context.event_id(),
        emitter: context.address,
        transaction: transaction.id.clone(),
        timestamp: context.block_timestamp,
        contract: contract.id.clone(),
        forwarder_address,
    };
    insert_fact(store, fact)
}

/// Record a `MetaTransactionExecuted` fact.
///
/// The accounts of `from` and `to` must already be stored.
pub fn record_meta_transaction_executed<S: Store + ?Sized>(
    store: &mut S,
    context: &LogContext,
    contract: &ForwarderContract,
    transaction: &Transaction,
    from: Address,
    to: Address,
) -> StoreResult<MetaTransactionExecuted> {
    let fact = MetaTransactionExecuted {
        id: context.event_id(),
        emitter: context.address,
        transaction: transaction.id.clone(),
        timestamp: context.block_timestamp,
        contract: contract.id.clone(),
        from,
        to,
    };
    insert_fact(store, fact)
}

/// Persist `fact` unless a fact with the same id already exists.
fn insert_fact<S, R>(store: &mut S, fact: R) -> StoreResult<R>
where
    S: Store + ?Sized,
    R: Record + Clone + PartialEq + std::fmt::Debug,
{
    debug_assert!(R::KIND.is_fact(), "{} is not an event fact", R::KIND);

    if let Some(existing) = store.get::<R>(fact.id())? {
        if existing != fact {
            tracing::warn!(
                target: "torii_forwarder::recorder",
                kind = %R::KIND,
                id = existing.id(),
                ?existing,
                replayed = ?fact,
                "Replayed log differs from recorded fact, keeping the recorded one"
            );
        } else {
            tracing::trace!(
                target: "torii_forwarder::recorder",
                kind = %R::KIND,
                id = existing.id(),
                "Fact already recorded"
            );
        }
        return Ok(existing);
    }

    store.put(fact.clone())?;
    tracing::debug!(
        target: "torii_forwarder::recorder",
        kind = %R::KIND,
        id = fact.id(),
        "Recorded fact"
    );
    Ok(fact)
}
