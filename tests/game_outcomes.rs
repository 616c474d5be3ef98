//! Single-party wager outcomes with scripted randomness.

use std::sync::Arc;

use vaultbreak::config::{BlackjackConfig, RouletteConfig, ShopConfig, StealConfig};
use vaultbreak::games::{
    BetOption, BlackjackGame, BlackjackResult, RouletteGame, StealGame, StealOutcome,
};
use vaultbreak::ledger::{ItemKind, LedgerStore, MemoryLedgerStore};
use vaultbreak::rng::{Draw, ScriptedRng};
use vaultbreak::session::SessionRegistry;
use vaultbreak::shop::Shop;

fn card(rank: u8) -> Draw {
    Draw::Index(usize::from(rank) - 1)
}

#[tokio::test]
async fn dealer_drawing_to_21_beats_a_standing_20() {
    let store = Arc::new(MemoryLedgerStore::new());
    store.adjust_pocket(1, 5_000).await.unwrap();

    // Player 10+10 = 20; dealer 10+6 = 16, draws a 5 → 21.
    let rng = Arc::new(ScriptedRng::new([
        card(10),
        card(10),
        card(10),
        card(6),
        card(5),
    ]));
    let game = BlackjackGame::new(
        store.clone(),
        Arc::new(SessionRegistry::new()),
        rng,
        BlackjackConfig::default(),
    );

    let mut round = game.start(1, 1, 1_000).await.unwrap();
    let outcome = round.stand().await.unwrap();

    assert_eq!(outcome.result, BlackjackResult::Lose);
    // No payout beyond the already-forfeited stake.
    assert_eq!(store.get_balance(1).await.unwrap().pocket, 4_000);
}

#[tokio::test]
async fn red_stake_pays_double_on_red_and_nothing_on_black() {
    for (spin, expected_pocket) in [(14usize, 6_000i64), (15usize, 4_000i64)] {
        let store = Arc::new(MemoryLedgerStore::new());
        store.adjust_pocket(1, 5_000).await.unwrap();

        let game = RouletteGame::new(
            store.clone(),
            Arc::new(ScriptedRng::new([Draw::Index(spin)])),
            RouletteConfig::default(),
        );
        let outcome = game.play(1, 1_000, &[BetOption::Red]).await.unwrap();

        let expected_payout = if spin == 14 { 2_000 } else { 0 };
        assert_eq!(outcome.payout, expected_payout);
        assert_eq!(store.get_balance(1).await.unwrap().pocket, expected_pocket);
    }
}

#[tokio::test]
async fn steal_respects_the_shield_bought_in_the_shop() {
    let store = Arc::new(MemoryLedgerStore::new());
    store.adjust_pocket(1, 1_000).await.unwrap();
    store.adjust_pocket(2, 150_000).await.unwrap();

    let shop = Shop::new(store.clone(), ShopConfig::default());
    shop.purchase(2, ItemKind::TheftShield).await.unwrap();

    let game = StealGame::new(
        store.clone(),
        Arc::new(ScriptedRng::new([Draw::Chance(false), Draw::Fraction(0.5)])),
        StealConfig::default(),
    );
    assert!(game.play(1, 2).await.is_err());

    // The shield doesn't protect the unshielded.
    let outcome = game.play(2, 1).await.unwrap();
    assert!(matches!(outcome, StealOutcome::Success { .. }));
}

#[tokio::test]
async fn luck_boost_widens_heist_odds_input() {
    // Not a probability assertion: just that the boost lands on the account
    // field the games read.
    let store = Arc::new(MemoryLedgerStore::new());
    store.adjust_pocket(1, 30_000).await.unwrap();

    let shop = Shop::new(store.clone(), ShopConfig::default());
    shop.purchase(1, ItemKind::LuckBoost).await.unwrap();

    let account = store.get_balance(1).await.unwrap();
    assert!((account.luck - 1.2).abs() < 1e-9);
}
