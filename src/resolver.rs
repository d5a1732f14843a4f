//! Fetch-or-create resolution of reference entities.
//!
//! Both operations are idempotent: the first call for an address creates and persists the
//! entity, later calls load it back without writing a duplicate.

use alloy_primitives::Address;

use crate::entities::{Account, ForwarderContract};
use crate::error::StoreResult;
use crate::ids::address_id;
use crate::store::{Store, StoreExt};

/// Load the account for `address`, creating and persisting it on first sighting.
pub fn fetch_account<S: Store + ?Sized>(store: &mut S, address: &Address) -> StoreResult<Account> {
    let id = address_id(address);
    if let Some(account) = store.get::<Account>(&id)? {
        return Ok(account);
    }

    let account = Account::new(address);
    store.put(account.clone())?;

    tracing::debug!(
        target: "torii_forwarder::resolver",
        account = %account.id,
        "Created account"
    );
    Ok(account)
}

/// Load the forwarder contract at `address`, creating it (and its account) on first sighting.
///
/// On return `contract.as_account == account.id` and `account.as_forwarder == contract.id`.
pub fn fetch_forwarder<S: Store + ?Sized>(
    store: &mut S,
    address: &Address,
) -> StoreResult<ForwarderContract> {
    let mut account = fetch_account(store, address)?;

    if let Some(contract) = store.get::<ForwarderContract>(&account.id)? {
        // A failure between the two writes below leaves the contract without its
        // back-reference; the retry completes the link.
        if account.as_forwarder.as_deref() != Some(contract.id.as_str()) {
            account.as_forwarder = Some(contract.id.clone());
            store.put(account)?;
            tracing::warn!(
                target: "torii_forwarder::resolver",
                contract = %contract.id,
                "Restored missing account back-reference"
            );
        }
        return Ok(contract);
    }

    let contract = ForwarderContract::for_account(&account);
    account.as_forwarder = Some(contract.id.clone());

    store.put(contract.clone())?;
    store.put(account)?;

    tracing::debug!(
        target: "torii_forwarder::resolver",
        contract = %contract.id,
        "Created forwarder contract"
    );
    Ok(contract)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityKind;
    use crate::store::MemoryStore;
    use alloy_primitives::address;

    const FORWARDER: Address = address!("0xaaa0000000000000000000000000000000000001");

    #[test]
    fn test_fetch_account_creates_once() {
        let mut store = MemoryStore::new();

        let first = fetch_account(&mut store, &FORWARDER).unwrap();
        let second = fetch_account(&mut store, &FORWARDER).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.id, "0xaaa0000000000000000000000000000000000001");
        assert_eq!(first.as_forwarder, None);
        assert_eq!(store.count(EntityKind::Account), 1);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_fetch_forwarder_links_both_ways() {
        let mut store = MemoryStore::new();

        let contract = fetch_forwarder(&mut store, &FORWARDER).unwrap();
        let account = store.get::<Account>(&contract.id).unwrap().unwrap();

        assert_eq!(contract.as_account, account.id);
        assert_eq!(account.as_forwarder.as_deref(), Some(contract.id.as_str()));
    }

    #[test]
    fn test_fetch_forwarder_is_idempotent() {
        let mut store = MemoryStore::new();

        let first = fetch_forwarder(&mut store, &FORWARDER).unwrap();
        let writes = store.writes();
        let second = fetch_forwarder(&mut store, &FORWARDER).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.writes(), writes);
        assert_eq!(store.count(EntityKind::Account), 1);
        assert_eq!(store.count(EntityKind::ForwarderContract), 1);
    }

    #[test]
    fn test_fetch_forwarder_upgrades_existing_account() {
        let mut store = MemoryStore::new();
        fetch_account(&mut store, &FORWARDER).unwrap();

        fetch_forwarder(&mut store, &FORWARDER).unwrap();

        let account = store
            .get::<Account>(&address_id(&FORWARDER))
            .unwrap()
            .unwrap();
        assert!(account.as_forwarder.is_some());
        assert_eq!(store.count(EntityKind::Account), 1);
    }

    #[test]
    fn test_fetch_forwarder_repairs_partial_write() {
        let mut store = MemoryStore::new();
        let account = Account::new(&FORWARDER);
        store.put(account.clone()).unwrap();
        store.put(ForwarderContract::for_account(&account)).unwrap();

        let contract = fetch_forwarder(&mut store, &FORWARDER).unwrap();

        let account = store.get::<Account>(&contract.id).unwrap().unwrap();
        assert_eq!(account.as_forwarder, Some(contract.id));
    }
}
