//! Indexes the captured log fixture the way the binary does.

use std::path::PathBuf;

use alloy_primitives::address;
use torii_forwarder::{
    DeploymentManifest, EntityKind, ForwarderDecoder, IndexStats, Indexer, JsonLogSource,
    MemoryStore, SqliteStore,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_index_fixture_with_manifest() {
    let manifest = DeploymentManifest::from_path(fixture("deployment.json")).unwrap();
    assert_eq!(
        manifest.watched_addresses(),
        vec![address!("0xbbb0000000000000000000000000000000000002")]
    );

    let source = JsonLogSource::from_path(fixture("forwarder-logs.json")).unwrap();
    let decoder = ForwarderDecoder::new().with_contracts(manifest.watched_addresses());
    let dir = tempfile::tempdir().unwrap();
    let mut indexer = Indexer::new(SqliteStore::open(dir.path().join("fw.db")).unwrap(), decoder);

    let stats = indexer.process(source.logs()).unwrap();

    assert_eq!(
        stats,
        IndexStats {
            logs: 5,
            decoded: 2,
            skipped: 3,
            forwarders_created: 1,
            meta_transactions: 1,
        }
    );
    let store = indexer.into_store();
    assert_eq!(store.count(EntityKind::Account).unwrap(), 4);
    assert_eq!(store.count(EntityKind::ForwarderContract).unwrap(), 1);
    assert_eq!(store.count(EntityKind::Transaction).unwrap(), 2);
}

#[test]
fn test_index_fixture_without_filter() {
    let source = JsonLogSource::from_path(fixture("forwarder-logs.json")).unwrap();
    let mut indexer = Indexer::new(MemoryStore::new(), ForwarderDecoder::new());

    let stats = indexer.process(source.logs()).unwrap();

    // The log from the unwatched contract is decoded too; the removed one never is.
    assert_eq!(stats.decoded, 3);
    assert_eq!(stats.forwarders_created, 2);
    let store = indexer.store();
    assert_eq!(store.count(EntityKind::ForwarderContract), 2);
    assert_eq!(store.count(EntityKind::Account), 6);
    assert_eq!(store.count(EntityKind::Transaction), 3);
}

#[test]
fn test_fixture_is_served_in_chain_order() {
    let source = JsonLogSource::from_path(fixture("forwarder-logs.json")).unwrap();

    let order: Vec<_> = source
        .logs()
        .iter()
        .map(|log| (log.block_number, log.log_index))
        .collect();

    assert_eq!(order, vec![(10, 0), (12, 1), (12, 2), (13, 0), (14, 0)]);
}
