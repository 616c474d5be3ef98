//! Game error types.

use thiserror::Error;

use crate::ledger::{LedgerError, UserId};
use crate::session::SessionError;

/// Game errors
#[derive(Debug, Error)]
pub enum GameError {
    /// Stake below the table minimum or otherwise malformed
    #[error("Invalid stake {got}: minimum is {min}")]
    InvalidStake { min: i64, got: i64 },

    /// Wagering against yourself
    #[error("You cannot target yourself")]
    SelfTarget,

    /// Target holds an active theft shield
    #[error("User {0} is protected by a theft shield")]
    TargetShielded(UserId),

    /// Target has nothing worth taking
    #[error("User {0} has nothing to take")]
    TargetBroke(UserId),

    /// Bet selection was empty or unparseable
    #[error("Invalid bet: {0}")]
    InvalidBet(String),

    /// One or more payouts could not be committed after the stakes were
    /// already debited; the failures are logged for manual reconciliation
    #[error("Resolution incomplete: {failed} of {total} payouts failed")]
    PayoutIncomplete { failed: usize, total: usize },

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Ledger error
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl GameError {
    /// A client-safe message that doesn't leak internal detail.
    pub fn client_message(&self) -> String {
        match self {
            GameError::Session(err) => err.client_message(),
            GameError::Ledger(err) => err.client_message(),
            GameError::PayoutIncomplete { .. } => {
                "Something went wrong settling the game. Staff have been notified.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
