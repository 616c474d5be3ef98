//! Ledger error types.

use thiserror::Error;

use super::models::UserId;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Insufficient pocket balance for a pre-checked debit
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: i64, required: i64 },

    /// Amount must be positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Daily reward already claimed within the cooldown
    #[error("Daily reward not available until {0}")]
    DailyNotAvailable(chrono::DateTime<chrono::Utc>),

    /// Transfer source and destination are the same account
    #[error("Cannot transfer to self (user {0})")]
    SelfTransfer(UserId),

    /// Inventory payload could not be decoded
    #[error("Corrupt inventory for user {user_id}: {source}")]
    CorruptInventory {
        user_id: UserId,
        #[source]
        source: serde_json::Error,
    },

    /// Retries exhausted against an unavailable store
    #[error("Store unavailable after {attempts} attempts: {last}")]
    Unavailable { attempts: u32, last: String },
}

impl LedgerError {
    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Only infrastructure failures qualify; validation and state errors are
    /// deterministic and retrying them just burns attempts.
    pub fn is_transient(&self) -> bool {
        match self {
            LedgerError::Database(e) => matches!(
                e,
                sqlx::Error::Io(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            ),
            _ => false,
        }
    }

    /// A client-safe message that doesn't leak internal detail.
    pub fn client_message(&self) -> String {
        match self {
            LedgerError::Database(_) | LedgerError::Unavailable { .. } => {
                "The vault is unreachable right now. Try again later.".to_string()
            }
            LedgerError::CorruptInventory { .. } => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
