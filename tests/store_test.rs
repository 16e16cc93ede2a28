// Snapshot persistence tests for the sled-backed store

use bandledger::identity::AccountId;
use bandledger::ledger::{BandLedger, InMemoryAssets};
use bandledger::storage::LedgerStore;
use tempfile::TempDir;

// ============================================================================
// SNAPSHOT ROUND-TRIP
// ============================================================================

#[test]
fn test_empty_store_has_no_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let store = LedgerStore::open(temp_dir.path()).unwrap();

    assert!(store.load_ledger().unwrap().is_none());
}

#[test]
fn test_snapshot_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let owner = AccountId::from_seed("owner");
    let alice = AccountId::from_seed("alice");
    let bob = AccountId::from_seed("bob");

    let mut ledger = BandLedger::new();
    let mut assets = InMemoryAssets::new();
    assets.mint(&owner, 1000);

    let band = ledger.create_band("The Sharps", &owner).unwrap();
    ledger.add_member(band, &alice, "Alice", 40, &owner).unwrap();
    ledger.add_member(band, &bob, "Bob", 35, &owner).unwrap();
    ledger.deposit_payment(band, 1000, &owner, &mut assets).unwrap();
    ledger.withdraw_earnings(band, &alice, &mut assets).unwrap();

    {
        let store = LedgerStore::open(temp_dir.path()).unwrap();
        store.save_ledger(&ledger).unwrap();
        store.flush().unwrap();
    }

    let store = LedgerStore::open(temp_dir.path()).unwrap();
    let restored = store.load_ledger().unwrap().unwrap();

    assert_eq!(restored.get_total_bands(), 1);
    assert_eq!(restored.get_band_balance(band), Some(600));
    assert_eq!(restored.get_band_info(band).unwrap().name(), "The Sharps");
    assert_eq!(restored.get_band_info(band).unwrap().total_members(), 2);
    assert_eq!(restored.get_member_info(band, &alice).unwrap().total_earned(), 400);
    assert_eq!(restored.get_member_info(band, &bob).unwrap().joined_at(), 1);
    assert_eq!(restored.get_member_join_order(), 2);
}

#[test]
fn test_restored_ledger_keeps_allocating_fresh_ids() {
    let temp_dir = TempDir::new().unwrap();
    let owner = AccountId::from_seed("owner");

    let mut ledger = BandLedger::new();
    ledger.create_band("One", &owner).unwrap();
    ledger.create_band("Two", &owner).unwrap();

    let store = LedgerStore::open(temp_dir.path()).unwrap();
    store.save_ledger(&ledger).unwrap();

    let mut restored = store.load_ledger().unwrap().unwrap();
    let third = restored.create_band("Three", &owner).unwrap();

    assert_eq!(third.as_u64(), 3);
    assert_eq!(restored.get_total_bands(), 3);
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let owner = AccountId::from_seed("owner");
    let store = LedgerStore::open(temp_dir.path()).unwrap();

    let mut ledger = BandLedger::new();
    store.save_ledger(&ledger).unwrap();

    ledger.create_band("Later", &owner).unwrap();
    store.save_ledger(&ledger).unwrap();

    let restored = store.load_ledger().unwrap().unwrap();
    assert_eq!(restored.get_total_bands(), 1);
}
