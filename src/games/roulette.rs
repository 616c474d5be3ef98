//! Roulette: a synchronous weighted-draw wager.
//!
//! The stake is split evenly across the chosen options (integer division,
//! remainder lost) and debited up front. One European spin settles every
//! option: colors pay 2x their slice, green pays 14x, a straight number 35x.

use log::info;
use std::sync::Arc;

use crate::config::RouletteConfig;
use crate::interact::ReplyPayload;
use crate::ledger::{LedgerError, LedgerStore, UserId};
use crate::rng::WagerRng;

use super::errors::{GameError, GameResult};

/// Red pockets on a European wheel.
const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Color of a wheel pocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
    Green,
}

/// Color of pocket `number` (0 is green).
pub fn color_of(number: u8) -> Color {
    if number == 0 {
        Color::Green
    } else if RED_NUMBERS.contains(&number) {
        Color::Red
    } else {
        Color::Black
    }
}

/// One option a stake slice rides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetOption {
    Red,
    Black,
    Green,
    Number(u8),
}

impl BetOption {
    fn matches(self, spin: u8) -> bool {
        match self {
            BetOption::Red => color_of(spin) == Color::Red,
            BetOption::Black => color_of(spin) == Color::Black,
            BetOption::Green => spin == 0,
            BetOption::Number(n) => spin == n,
        }
    }
}

impl std::fmt::Display for BetOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BetOption::Red => write!(f, "red"),
            BetOption::Black => write!(f, "black"),
            BetOption::Green => write!(f, "green"),
            BetOption::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Result of one spin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouletteOutcome {
    pub spin: u8,
    pub color: Color,
    pub stake: i64,
    /// Total credited back; zero when every option missed.
    pub payout: i64,
    /// The options that hit.
    pub winners: Vec<BetOption>,
}

impl RouletteOutcome {
    pub fn render(&self) -> ReplyPayload {
        let color = match self.color {
            Color::Red => "red",
            Color::Black => "black",
            Color::Green => "green",
        };
        let description = if self.payout > 0 {
            format!("The ball landed on {} ({color}). You won {}!", self.spin, self.payout)
        } else {
            format!(
                "The ball landed on {} ({color}). Your {} is gone.",
                self.spin, self.stake
            )
        };
        ReplyPayload::new("Roulette", description)
    }
}

/// Roulette game service.
pub struct RouletteGame {
    store: Arc<dyn LedgerStore>,
    rng: Arc<dyn WagerRng>,
    config: RouletteConfig,
}

impl RouletteGame {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        rng: Arc<dyn WagerRng>,
        config: RouletteConfig,
    ) -> Arc<Self> {
        Arc::new(Self { store, rng, config })
    }

    /// Debit the stake, spin once, credit whatever the options pay.
    pub async fn play(
        &self,
        user: UserId,
        stake: i64,
        options: &[BetOption],
    ) -> GameResult<RouletteOutcome> {
        if stake <= 0 {
            return Err(GameError::InvalidStake { min: 1, got: stake });
        }
        if options.is_empty() {
            return Err(GameError::InvalidBet("pick at least one option".to_string()));
        }
        for option in options {
            if let BetOption::Number(n) = option {
                if *n > 36 {
                    return Err(GameError::InvalidBet(format!(
                        "{n} is not on the wheel"
                    )));
                }
            }
        }

        let account = self.store.get_balance(user).await?;
        if account.pocket < stake {
            return Err(GameError::Ledger(LedgerError::InsufficientBalance {
                available: account.pocket,
                required: stake,
            }));
        }
        self.store.adjust_pocket(user, -stake).await?;

        let slice = stake / options.len() as i64;
        let spin = self.rng.index(37) as u8;

        let mut payout = 0i64;
        let mut winners = Vec::new();
        for &option in options {
            if !option.matches(spin) {
                continue;
            }
            let multiplier = match option {
                BetOption::Red | BetOption::Black => self.config.color_multiplier,
                BetOption::Green => self.config.green_multiplier,
                BetOption::Number(_) => self.config.straight_multiplier,
            };
            payout += slice * multiplier;
            winners.push(option);
        }

        if payout > 0 {
            self.store.adjust_pocket(user, payout).await?;
        }
        info!("Roulette: user {user} staked {stake}, spin {spin}, payout {payout}");

        Ok(RouletteOutcome {
            spin,
            color: color_of(spin),
            stake,
            payout,
            winners,
        })
    }
}
