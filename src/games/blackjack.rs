//! Blackjack: an interactive single-party wager.
//!
//! The stake is debited when the round opens. The player hits, stands, or
//! doubles down; the dealer then draws to 17 or better. A win credits twice
//! the stake, a push returns it, a loss credits nothing.

use log::info;
use std::fmt;
use std::sync::Arc;

use crate::config::BlackjackConfig;
use crate::interact::ReplyPayload;
use crate::ledger::{ChannelKey, LedgerError, LedgerStore, UserId};
use crate::rng::WagerRng;
use crate::session::{GameKind, SessionError, SessionRegistry, SessionTicket};

use super::errors::{GameError, GameResult};

/// A card rank, 1 (ace) through 13 (king).
pub type Card = u8;

/// Hand value with aces counted as 11 then downgraded to 1 while busting.
pub fn hand_value(hand: &[Card]) -> u32 {
    let mut total = 0u32;
    let mut aces = 0u32;
    for &card in hand {
        match card {
            1 => {
                aces += 1;
                total += 11;
            }
            11..=13 => total += 10,
            n => total += u32::from(n),
        }
    }
    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }
    total
}

fn card_label(card: Card) -> &'static str {
    match card {
        1 => "A",
        2 => "2",
        3 => "3",
        4 => "4",
        5 => "5",
        6 => "6",
        7 => "7",
        8 => "8",
        9 => "9",
        10 => "10",
        11 => "J",
        12 => "Q",
        13 => "K",
        _ => "?",
    }
}

fn hand_label(hand: &[Card]) -> String {
    hand.iter()
        .map(|&c| card_label(c))
        .collect::<Vec<_>>()
        .join(" ")
}

/// How the round settled, with the final hands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackjackOutcome {
    pub result: BlackjackResult,
    pub stake: i64,
    pub player: Vec<Card>,
    pub dealer: Vec<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlackjackResult {
    /// Credited `payout` (twice the stake).
    Win { payout: i64 },
    /// Stake returned, nothing more.
    Push { returned: i64 },
    /// Stake forfeited.
    Lose,
}

impl BlackjackOutcome {
    pub fn render(&self) -> ReplyPayload {
        let (title, description) = match self.result {
            BlackjackResult::Win { payout } => {
                ("You win!", format!("Paid out {payout}."))
            }
            BlackjackResult::Push { returned } => {
                ("Push", format!("Stake of {returned} returned."))
            }
            BlackjackResult::Lose => ("Dealer wins", format!("You lost {}.", self.stake)),
        };
        ReplyPayload::new(title, description)
            .with_field(
                "Your hand",
                format!("{} ({})", hand_label(&self.player), hand_value(&self.player)),
            )
            .with_field(
                "Dealer",
                format!("{} ({})", hand_label(&self.dealer), hand_value(&self.dealer)),
            )
    }
}

/// Blackjack game service.
pub struct BlackjackGame {
    store: Arc<dyn LedgerStore>,
    registry: Arc<SessionRegistry>,
    rng: Arc<dyn WagerRng>,
    config: BlackjackConfig,
}

impl BlackjackGame {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        registry: Arc<SessionRegistry>,
        rng: Arc<dyn WagerRng>,
        config: BlackjackConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            registry,
            rng,
            config,
        })
    }

    fn draw(&self) -> Card {
        self.rng.index(13) as Card + 1
    }

    /// Open a round: claim the channel slot, debit the stake, deal two cards
    /// each (player first).
    pub async fn start(
        self: &Arc<Self>,
        channel: ChannelKey,
        user: UserId,
        stake: i64,
    ) -> GameResult<BlackjackRound> {
        if stake < self.config.min_bet {
            return Err(GameError::InvalidStake {
                min: self.config.min_bet,
                got: stake,
            });
        }

        let ticket = self.registry.try_begin(channel, GameKind::Blackjack).await?;
        if let Err(err) = debit_stake(self.store.as_ref(), user, stake).await {
            self.registry.end(&ticket).await;
            return Err(err);
        }

        let player = vec![self.draw(), self.draw()];
        let dealer = vec![self.draw(), self.draw()];
        info!("Blackjack round {} opened by user {user}, stake {stake}", ticket.id);

        Ok(BlackjackRound {
            game: self.clone(),
            ticket,
            user,
            stake,
            player,
            dealer,
            doubled: false,
            finished: false,
        })
    }
}

async fn debit_stake(store: &dyn LedgerStore, user: UserId, stake: i64) -> GameResult<()> {
    let account = store.get_balance(user).await?;
    if account.pocket < stake {
        return Err(GameError::Ledger(LedgerError::InsufficientBalance {
            available: account.pocket,
            required: stake,
        }));
    }
    store.adjust_pocket(user, -stake).await?;
    Ok(())
}

/// One in-progress round. `hit` may finish it (bust); `stand` and
/// `double_down` always do. A round the player walks away from must be
/// torn down with [`BlackjackRound::abort`] or the channel slot stays held.
pub struct BlackjackRound {
    game: Arc<BlackjackGame>,
    ticket: SessionTicket,
    user: UserId,
    stake: i64,
    player: Vec<Card>,
    dealer: Vec<Card>,
    doubled: bool,
    finished: bool,
}

impl fmt::Debug for BlackjackRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlackjackRound")
            .field("ticket", &self.ticket)
            .field("user", &self.user)
            .field("stake", &self.stake)
            .field("player", &self.player)
            .field("dealer", &self.dealer)
            .field("doubled", &self.doubled)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl BlackjackRound {
    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn player_hand(&self) -> &[Card] {
        &self.player
    }

    /// The dealer's face-up card.
    pub fn dealer_upcard(&self) -> Card {
        self.dealer[0]
    }

    fn ensure_open(&self) -> GameResult<()> {
        if self.finished {
            return Err(GameError::Session(SessionError::InvalidAction(
                "the round is already over".to_string(),
            )));
        }
        Ok(())
    }

    /// Draw one card. Returns the outcome if the hand busts, `None` while
    /// the round continues.
    pub async fn hit(&mut self) -> GameResult<Option<BlackjackOutcome>> {
        self.ensure_open()?;
        let card = self.game.draw();
        self.player.push(card);
        if hand_value(&self.player) > 21 {
            return Ok(Some(self.settle(BlackjackResult::Lose).await?));
        }
        Ok(None)
    }

    /// Stop drawing; the dealer plays out and the round settles.
    pub async fn stand(&mut self) -> GameResult<BlackjackOutcome> {
        self.ensure_open()?;
        self.play_dealer();

        let player_total = hand_value(&self.player);
        let dealer_total = hand_value(&self.dealer);

        let result = if dealer_total > 21 || player_total > dealer_total {
            let payout = self.stake * 2;
            self.game.store.adjust_pocket(self.user, payout).await?;
            BlackjackResult::Win { payout }
        } else if player_total == dealer_total {
            self.game.store.adjust_pocket(self.user, self.stake).await?;
            BlackjackResult::Push {
                returned: self.stake,
            }
        } else {
            BlackjackResult::Lose
        };
        self.settle(result).await
    }

    /// Double the stake, draw exactly one card, then stand.
    pub async fn double_down(&mut self) -> GameResult<BlackjackOutcome> {
        self.ensure_open()?;
        if self.doubled || self.player.len() != 2 {
            return Err(GameError::Session(SessionError::InvalidAction(
                "double down is only available on the first two cards".to_string(),
            )));
        }

        debit_stake(self.game.store.as_ref(), self.user, self.stake).await?;
        self.stake *= 2;
        self.doubled = true;

        let card = self.game.draw();
        self.player.push(card);
        if hand_value(&self.player) > 21 {
            return self.settle(BlackjackResult::Lose).await;
        }
        self.stand().await
    }

    /// Tear the round down without settling: the channel slot is released
    /// and the stake stays forfeited. For the command layer's
    /// timeout/cleanup path; an abort that refunded would let a player
    /// peek at a bad hand and walk away free.
    pub async fn abort(mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.game.registry.end(&self.ticket).await;
        info!(
            "Blackjack round {} aborted by user {}; stake {} forfeited",
            self.ticket.id, self.user, self.stake
        );
    }

    fn play_dealer(&mut self) {
        while hand_value(&self.dealer) < 17 {
            let card = self.game.draw();
            self.dealer.push(card);
        }
    }

    async fn settle(&mut self, result: BlackjackResult) -> GameResult<BlackjackOutcome> {
        self.finished = true;
        self.game.registry.end(&self.ticket).await;
        info!(
            "Blackjack round {} settled for user {}: {result:?}",
            self.ticket.id, self.user
        );
        Ok(BlackjackOutcome {
            result,
            stake: self.stake,
            player: self.player.clone(),
            dealer: self.dealer.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedgerStore;
    use crate::rng::{Draw, ScriptedRng};

    // Ranks are drawn as index + 1; rank 10 is index 9.
    fn card(rank: Card) -> Draw {
        Draw::Index(usize::from(rank) - 1)
    }

    async fn setup(
        pocket: i64,
        draws: Vec<Draw>,
    ) -> (Arc<MemoryLedgerStore>, Arc<BlackjackGame>) {
        let store = Arc::new(MemoryLedgerStore::new());
        store.adjust_pocket(1, pocket).await.unwrap();
        let game = BlackjackGame::new(
            store.clone(),
            Arc::new(SessionRegistry::new()),
            Arc::new(ScriptedRng::new(draws)),
            BlackjackConfig::default(),
        );
        (store, game)
    }

    #[test]
    fn hand_value_downgrades_aces() {
        assert_eq!(hand_value(&[1, 10]), 21);
        assert_eq!(hand_value(&[1, 1, 9]), 21);
        assert_eq!(hand_value(&[1, 10, 5]), 16);
        assert_eq!(hand_value(&[13, 12, 5]), 25);
    }

    #[tokio::test]
    async fn stake_below_minimum_is_rejected() {
        let (_, game) = setup(10_000, vec![]).await;
        assert!(matches!(
            game.start(1, 1, 500).await.unwrap_err(),
            GameError::InvalidStake { min: 1_000, got: 500 }
        ));
    }

    #[tokio::test]
    async fn dealer_drawing_to_21_beats_player_20() {
        // Player 10+10 = 20; dealer 10+6 = 16, draws 5 → 21.
        let (store, game) = setup(5_000, vec![
            card(10),
            card(10),
            card(10),
            card(6),
            card(5),
        ])
        .await;

        let mut round = game.start(1, 1, 1_000).await.unwrap();
        let outcome = round.stand().await.unwrap();
        assert_eq!(outcome.result, BlackjackResult::Lose);
        assert_eq!(hand_value(&outcome.dealer), 21);
        // Stake forfeited, nothing credited.
        assert_eq!(store.get_balance(1).await.unwrap().pocket, 4_000);
    }

    #[tokio::test]
    async fn win_pays_twice_the_stake() {
        // Player 10+10 = 20; dealer 10+8 = 18, stands.
        let (store, game) = setup(5_000, vec![
            card(10),
            card(10),
            card(10),
            card(8),
        ])
        .await;

        let mut round = game.start(1, 1, 1_000).await.unwrap();
        let outcome = round.stand().await.unwrap();
        assert_eq!(outcome.result, BlackjackResult::Win { payout: 2_000 });
        assert_eq!(store.get_balance(1).await.unwrap().pocket, 6_000);
    }

    #[tokio::test]
    async fn push_returns_exactly_the_stake() {
        // Both stand on 20.
        let (store, game) = setup(5_000, vec![
            card(10),
            card(10),
            card(10),
            card(10),
        ])
        .await;

        let mut round = game.start(1, 1, 1_000).await.unwrap();
        let outcome = round.stand().await.unwrap();
        assert_eq!(outcome.result, BlackjackResult::Push { returned: 1_000 });
        assert_eq!(store.get_balance(1).await.unwrap().pocket, 5_000);
    }

    #[tokio::test]
    async fn bust_on_hit_ends_the_round() {
        // Player 10+6, hits a king → 26.
        let (store, game) = setup(5_000, vec![
            card(10),
            card(6),
            card(9),
            card(9),
            card(13),
        ])
        .await;

        let mut round = game.start(1, 1, 1_000).await.unwrap();
        let outcome = round.hit().await.unwrap().expect("bust ends the round");
        assert_eq!(outcome.result, BlackjackResult::Lose);
        assert_eq!(store.get_balance(1).await.unwrap().pocket, 4_000);

        // The round can't be acted on again, and the channel slot is free.
        assert!(round.stand().await.is_err());
        game.start(1, 1, 1_000).await.unwrap();
    }

    #[tokio::test]
    async fn aborted_round_frees_the_channel_slot_and_keeps_the_stake() {
        let (store, game) = setup(5_000, vec![
            card(10),
            card(6),
            card(9),
            card(9),
            card(10),
            card(10),
            card(10),
            card(8),
        ])
        .await;

        let round = game.start(7, 1, 1_000).await.unwrap();
        assert!(format!("{round:?}").contains("BlackjackRound"));

        // While the round is live, the channel slot is held.
        assert!(matches!(
            game.start(7, 1, 1_000).await.unwrap_err(),
            GameError::Session(SessionError::AlreadyActive { .. })
        ));

        round.abort().await;

        // No refund, and the slot is free again.
        assert_eq!(store.get_balance(1).await.unwrap().pocket, 4_000);
        game.start(7, 1, 1_000).await.unwrap();
    }

    #[tokio::test]
    async fn double_down_re_debits_and_draws_once() {
        // Player 5+6 = 11, doubles, draws 10 → 21; dealer 10+9 stands on 19.
        let (store, game) = setup(5_000, vec![
            card(5),
            card(6),
            card(10),
            card(9),
            card(10),
        ])
        .await;

        let mut round = game.start(1, 1, 1_000).await.unwrap();
        let outcome = round.double_down().await.unwrap();
        assert_eq!(outcome.result, BlackjackResult::Win { payout: 4_000 });
        assert_eq!(outcome.stake, 2_000);
        // 5000 - 1000 - 1000 + 4000.
        assert_eq!(store.get_balance(1).await.unwrap().pocket, 7_000);
    }
}
