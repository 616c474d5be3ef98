//! The wager games and cosmetic state machines.
//!
//! Each game is a small service holding the ledger store, the session
//! registry (where a channel slot is needed), and a [`WagerRng`] seam. All
//! probabilistic outcomes are deterministic given the rng's draws.
//!
//! [`WagerRng`]: crate::rng::WagerRng

pub mod blackjack;
pub mod daily;
pub mod duel;
pub mod errors;
pub mod heist;
pub mod roulette;
pub mod shootout;
pub mod steal;

pub use blackjack::{BlackjackGame, BlackjackOutcome, BlackjackResult, BlackjackRound};
pub use daily::DailyReward;
pub use duel::{DuelAction, DuelGame, DuelMatch, DuelOutcome, RoundReport};
pub use errors::{GameError, GameResult};
pub use heist::{HeistGame, HeistOutcome, HeistSession};
pub use roulette::{BetOption, Color, RouletteGame, RouletteOutcome};
pub use shootout::{PullReport, ShootoutGame, ShootoutMatch};
pub use steal::{StealGame, StealOutcome};
