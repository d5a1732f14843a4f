//! Replay safety and referential ordering of recorded facts.

use alloy_primitives::{address, b256, Address};
use torii_forwarder::ids::address_id;
use torii_forwarder::{
    dispatch, DecodedLog, Entity, EntityKind, ForwarderEvent, LogContext, MemoryStore,
    SqliteStore, Store, StoreExt, StoreResult,
};

const ORIGIN: Address = address!("0xbbb0000000000000000000000000000000000002");

fn logs() -> Vec<DecodedLog> {
    let context = LogContext {
        address: ORIGIN,
        block_number: 10,
        block_timestamp: 1_700_000_000,
        transaction_hash: b256!("0xccc0000000000000000000000000000000000000000000000000000000000003"),
        log_index: 0,
    };
    vec![
        DecodedLog {
            context,
            event: ForwarderEvent::ForwarderCreated {
                forwarder_address: address!("0xaaa0000000000000000000000000000000000001"),
            },
        },
        DecodedLog {
            context: LogContext {
                log_index: 1,
                ..context
            },
            event: ForwarderEvent::MetaTransactionExecuted {
                from: address!("0xddd0000000000000000000000000000000000004"),
                to: address!("0xeee0000000000000000000000000000000000005"),
            },
        },
    ]
}

/// Store that refuses facts whose references are not stored yet.
#[derive(Default)]
struct OrderCheckingStore {
    inner: MemoryStore,
}

impl OrderCheckingStore {
    fn require(&self, kind: EntityKind, id: &str) {
        assert!(
            self.inner.load(kind, id).unwrap().is_some(),
            "{kind} {id} saved after a fact referencing it"
        );
    }
}

impl Store for OrderCheckingStore {
    fn load(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Entity>> {
        self.inner.load(kind, id)
    }

    fn save(&mut self, entity: Entity) -> StoreResult<()> {
        match &entity {
            Entity::ForwarderCreated(fact) => {
                self.require(EntityKind::ForwarderContract, &fact.contract);
                self.require(EntityKind::Transaction, &fact.transaction);
                self.require(EntityKind::Account, &address_id(&fact.emitter));
                self.require(EntityKind::Account, &address_id(&fact.forwarder_address));
            }
            Entity::MetaTransactionExecuted(fact) => {
                self.require(EntityKind::ForwarderContract, &fact.contract);
                self.require(EntityKind::Transaction, &fact.transaction);
                self.require(EntityKind::Account, &address_id(&fact.from));
                self.require(EntityKind::Account, &address_id(&fact.to));
            }
            Entity::ForwarderContract(contract) => {
                self.require(EntityKind::Account, &contract.as_account);
            }
            Entity::Account(_) | Entity::Transaction(_) => {}
        }
        self.inner.save(entity)
    }
}

#[test]
fn test_references_are_saved_before_facts() {
    let mut store = OrderCheckingStore::default();

    for log in logs() {
        dispatch(&mut store, &log).unwrap();
    }

    assert_eq!(store.inner.count(EntityKind::ForwarderCreated), 1);
    assert_eq!(store.inner.count(EntityKind::MetaTransactionExecuted), 1);
}

#[test]
fn test_replay_keeps_memory_store_unchanged() {
    let mut store = MemoryStore::new();
    for log in logs() {
        dispatch(&mut store, &log).unwrap();
    }
    let snapshot = store.clone();

    for log in logs() {
        dispatch(&mut store, &log).unwrap();
    }

    assert_eq!(store.writes(), snapshot.writes());
    for kind in EntityKind::ALL {
        let before: Vec<_> = snapshot.iter_kind(kind).collect();
        let after: Vec<_> = store.iter_kind(kind).collect();
        assert_eq!(before, after, "{kind} changed on replay");
    }
}

#[test]
fn test_replay_is_byte_identical_in_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forwarder.db");
    let logs = logs();

    let mut ids = Vec::new();
    let mut bodies = Vec::new();
    {
        let mut store = SqliteStore::open(&path).unwrap();
        for log in &logs {
            let fact = dispatch(&mut store, log).unwrap();
            bodies.push(store.raw_body(fact.kind(), fact.id()).unwrap().unwrap());
            ids.push((fact.kind(), fact.id().to_string()));
        }
    }

    // A restarted indexer replays the same logs.
    let mut store = SqliteStore::open(&path).unwrap();
    for log in &logs {
        dispatch(&mut store, log).unwrap();
    }

    for ((kind, id), body) in ids.iter().zip(&bodies) {
        assert_eq!(store.raw_body(*kind, id).unwrap().as_ref(), Some(body));
    }
    assert_eq!(store.count(EntityKind::ForwarderCreated).unwrap(), 1);
    assert_eq!(store.count(EntityKind::MetaTransactionExecuted).unwrap(), 1);
    assert_eq!(store.count(EntityKind::Account).unwrap(), 4);
    assert_eq!(store.count(EntityKind::ForwarderContract).unwrap(), 1);
}

#[test]
fn test_retry_after_partial_forwarder_write() {
    let mut store = MemoryStore::new();
    // Simulate a crash after the contract write but before the account update.
    store
        .put(torii_forwarder::ForwarderContract {
            id: address_id(&ORIGIN),
            as_account: address_id(&ORIGIN),
        })
        .unwrap();

    for log in logs() {
        dispatch(&mut store, &log).unwrap();
    }

    let account = store
        .get::<torii_forwarder::Account>(&address_id(&ORIGIN))
        .unwrap()
        .unwrap();
    assert_eq!(account.as_forwarder, Some(address_id(&ORIGIN)));
}
