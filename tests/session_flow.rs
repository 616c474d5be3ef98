//! Session registry and heist lifecycle, end to end over the in-memory
//! store with scripted randomness.

use std::sync::Arc;
use std::time::Duration;

use vaultbreak::config::HeistConfig;
use vaultbreak::games::{GameError, HeistGame, HeistOutcome};
use vaultbreak::ledger::{LedgerStore, MemoryLedgerStore};
use vaultbreak::rng::{Draw, ScriptedRng};
use vaultbreak::session::{GameKind, SessionError, SessionRegistry};

async fn funded_store(users: &[(i64, i64, i64)]) -> Arc<MemoryLedgerStore> {
    let store = Arc::new(MemoryLedgerStore::new());
    for &(user, pocket, bank) in users {
        if pocket > 0 {
            store.adjust_pocket(user, pocket).await.unwrap();
        }
        if bank > 0 {
            store.set_bank_limit(user, bank).await.unwrap();
            store.adjust_bank(user, bank).await.unwrap();
        }
    }
    store
}

#[tokio::test]
async fn two_concurrent_begins_yield_one_winner() {
    let registry = Arc::new(SessionRegistry::new());
    let (a, b) = tokio::join!(
        registry.try_begin(5, GameKind::Heist),
        registry.try_begin(5, GameKind::Heist),
    );
    assert!(a.is_ok() != b.is_ok());
    let loser = if a.is_err() { a } else { b };
    assert!(matches!(
        loser.unwrap_err(),
        SessionError::AlreadyActive { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn lone_initiator_is_refunded_at_expiry() {
    let store = funded_store(&[(1, 5_000, 0), (9, 0, 10_000)]).await;
    let registry = Arc::new(SessionRegistry::new());
    let game = HeistGame::new(
        store.clone(),
        registry.clone(),
        Arc::new(ScriptedRng::default()),
        HeistConfig::default(),
    );

    let session = game.start(5, 1, 9).await.unwrap();
    assert_eq!(store.get_balance(1).await.unwrap().pocket, 3_000);

    let runner = tokio::spawn(async move { session.run().await });
    tokio::time::advance(Duration::from_secs(61)).await;
    let outcome = runner.await.unwrap().unwrap();

    assert_eq!(outcome, HeistOutcome::Cancelled { refunded: vec![1] });
    // Stake refunded exactly once and the channel slot freed.
    assert_eq!(store.get_balance(1).await.unwrap().pocket, 5_000);
    assert!(!registry.is_active(5, GameKind::Heist).await);
}

#[tokio::test]
async fn two_member_heist_success_scenario() {
    // Target bank 10_000, loot fraction 0.5, both members survive.
    let store = funded_store(&[(1, 6_000, 0), (2, 6_000, 0), (9, 0, 10_000)]).await;
    let registry = Arc::new(SessionRegistry::new());
    let rng = Arc::new(ScriptedRng::new([
        Draw::Chance(true),
        Draw::Fraction(0.5),
        Draw::Chance(true),
        Draw::Chance(true),
    ]));
    let game = HeistGame::new(store.clone(), registry.clone(), rng, HeistConfig::default());

    let session = game.start(5, 1, 9).await.unwrap();
    session.join(2).await.unwrap();
    let outcome = session.resolve_now().await.unwrap();

    match outcome {
        HeistOutcome::Success {
            loot,
            share,
            survivors,
            target_bank_after,
            ..
        } => {
            assert_eq!(loot, 5_000);
            assert_eq!(share, 2_500);
            assert_eq!(survivors, vec![1, 2]);
            assert_eq!(target_bank_after, 5_000);
        }
        other => panic!("expected success, got {other:?}"),
    }

    // pre-stake pocket - 2000 fee + 2500 share.
    assert_eq!(store.get_balance(1).await.unwrap().pocket, 6_500);
    assert_eq!(store.get_balance(2).await.unwrap().pocket, 6_500);
    assert_eq!(store.get_balance(9).await.unwrap().bank, 5_000);
}

#[tokio::test]
async fn target_cannot_join_their_own_heist() {
    let store = funded_store(&[(1, 6_000, 0), (9, 6_000, 10_000)]).await;
    let game = HeistGame::new(
        store,
        Arc::new(SessionRegistry::new()),
        Arc::new(ScriptedRng::default()),
        HeistConfig::default(),
    );

    let session = game.start(5, 1, 9).await.unwrap();
    assert!(matches!(
        session.join(9).await.unwrap_err(),
        GameError::SelfTarget
    ));
}

#[tokio::test]
async fn second_heist_in_channel_routes_to_join() {
    let store = funded_store(&[(1, 6_000, 0), (2, 6_000, 0), (9, 0, 10_000)]).await;
    let game = HeistGame::new(
        store,
        Arc::new(SessionRegistry::new()),
        Arc::new(ScriptedRng::default()),
        HeistConfig::default(),
    );

    let _session = game.start(5, 1, 9).await.unwrap();
    let err = game.start(5, 2, 9).await.unwrap_err();
    assert!(matches!(
        err,
        GameError::Session(SessionError::AlreadyActive { .. })
    ));
}
