//! # Vaultbreak
//!
//! The shared-session wager game engine and balance ledger behind a
//! chat-platform economy bot.
//!
//! Users hold an [`Account`](ledger::Account) with pocket cash (spendable,
//! at risk in wagers), banked cash (protected, capped by a purchasable
//! limit), a luck multiplier, and an item inventory. Every balance mutation
//! funnels through the [`LedgerStore`](ledger::LedgerStore) trait's atomic
//! operations, backed by PostgreSQL in production and by an in-memory store
//! in tests.
//!
//! ## Architecture
//!
//! - [`ledger`]: accounts, the store trait, the Pg and in-memory backends,
//!   and the retry policy wrapping the Pg store's calls.
//! - [`session`]: the per-channel session registry (one game of each kind
//!   per channel) and the timed recruitment phase for multi-party wagers.
//! - [`games`]: heist (multi-party), blackjack, roulette, steal
//!   (single-party wagers), plus the cosmetic duel and shootout state
//!   machines.
//! - [`shop`]: item purchases that apply lasting account effects.
//! - [`interact`]: the invocation seam the chat front implements, and the
//!   reply payloads games render into.
//! - [`rng`]: the randomness seam; resolution is deterministic given its
//!   draws.
//!
//! The chat-command routing layer and message delivery are external: they
//! resolve the acting user and channel, call in through these services, and
//! ship the returned payloads back to the channel.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use vaultbreak::config::RouletteConfig;
//! use vaultbreak::games::{BetOption, RouletteGame};
//! use vaultbreak::ledger::{LedgerStore, MemoryLedgerStore};
//! use vaultbreak::rng::StdWagerRng;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store: Arc<MemoryLedgerStore> = Arc::new(MemoryLedgerStore::new());
//! store.adjust_pocket(1, 5_000).await.unwrap();
//!
//! let roulette = RouletteGame::new(store, Arc::new(StdWagerRng), RouletteConfig::default());
//! let outcome = roulette.play(1, 1_000, &[BetOption::Red]).await.unwrap();
//! println!("{}", outcome.render().description);
//! # }
//! ```

/// Per-game tunables.
pub mod config;

/// PostgreSQL pool management.
pub mod db;
pub use db::{Database, DatabaseConfig};

/// Accounts and atomic balance operations.
pub mod ledger;
pub use ledger::{Account, LedgerError, LedgerStore, MemoryLedgerStore, PgLedgerStore};

/// Channel sessions and recruitment.
pub mod session;
pub use session::{SessionError, SessionRegistry};

/// The games.
pub mod games;
pub use games::{GameError, GameResult};

/// Item shop.
pub mod shop;
pub use shop::Shop;

/// Chat-front seam.
pub mod interact;
pub use interact::{Invocation, ReplyPayload};

/// Randomness seam.
pub mod rng;
pub use rng::{StdWagerRng, WagerRng};
