//! Ledger invariants over the in-memory store, which shares its clamp and
//! cooldown semantics with the Pg backend.

use std::sync::Arc;

use vaultbreak::ledger::{
    LedgerError, LedgerStore, MemoryLedgerStore, DEFAULT_BANK_LIMIT, MAX_CURRENCY,
};

#[tokio::test]
async fn pocket_stays_within_bounds_under_any_sequence() {
    let store = MemoryLedgerStore::new();
    let deltas = [500i64, -2_000, i64::MAX, 37, -1, i64::MIN, 1_000];
    for delta in deltas {
        let pocket = store.adjust_pocket(1, delta).await.unwrap();
        assert!((0..=MAX_CURRENCY).contains(&pocket));
    }
}

#[tokio::test]
async fn bank_credit_applies_only_the_headroom() {
    let store = MemoryLedgerStore::new();

    // Headroom 10_000, credit 15_000: exactly the headroom lands.
    let result = store.adjust_bank(1, 15_000).await.unwrap();
    assert!(result.applied);
    assert_eq!(result.bank, DEFAULT_BANK_LIMIT);

    // Bank full: nothing applied, nothing changed.
    let result = store.adjust_bank(1, 1).await.unwrap();
    assert!(!result.applied);
    assert_eq!(result.bank, DEFAULT_BANK_LIMIT);

    // Debits clamp at zero like pocket debits.
    let result = store.adjust_bank(1, -50_000).await.unwrap();
    assert_eq!(result.bank, 0);
}

#[tokio::test]
async fn concurrent_pocket_adjustments_are_never_lost() {
    let store = Arc::new(MemoryLedgerStore::new());

    let mut handles = Vec::new();
    for i in 0..100i64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.adjust_pocket(1, 10 + i % 3).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let expected: i64 = (0..100i64).map(|i| 10 + i % 3).sum();
    assert_eq!(store.get_balance(1).await.unwrap().pocket, expected);
}

#[tokio::test]
async fn get_balance_is_idempotent_for_new_users() {
    let store = MemoryLedgerStore::new();
    let first = store.get_balance(77).await.unwrap();
    let second = store.get_balance(77).await.unwrap();

    assert_eq!(first.user_id, second.user_id);
    assert_eq!(first.created_at, second.created_at);
    assert_eq!(second.pocket, 0);
    assert_eq!(second.bank_limit, DEFAULT_BANK_LIMIT);
}

#[tokio::test]
async fn deposit_and_withdraw_round_trip() {
    let store = MemoryLedgerStore::new();
    store.adjust_pocket(1, 8_000).await.unwrap();

    let deposit = store.deposit(1, 3_000).await.unwrap();
    assert_eq!(deposit.bank, 3_000);

    let pocket = store.withdraw(1, 3_000).await.unwrap();
    assert_eq!(pocket, 8_000);
    assert_eq!(store.get_balance(1).await.unwrap().bank, 0);
}

#[tokio::test]
async fn transfer_is_all_or_nothing() {
    let store = MemoryLedgerStore::new();
    store.adjust_pocket(1, 300).await.unwrap();

    let err = store.transfer_pocket(1, 2, 500).await.unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    assert_eq!(store.get_balance(1).await.unwrap().pocket, 300);
    assert_eq!(store.get_balance(2).await.unwrap().pocket, 0);

    store.transfer_pocket(1, 2, 300).await.unwrap();
    assert_eq!(store.get_balance(1).await.unwrap().pocket, 0);
    assert_eq!(store.get_balance(2).await.unwrap().pocket, 300);
}
