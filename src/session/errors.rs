//! Session error types.

use thiserror::Error;

use crate::ledger::{ChannelKey, LedgerError, UserId};

use super::registry::GameKind;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Another session of this kind already runs in the channel
    #[error("A {kind} session is already running in channel {channel}")]
    AlreadyActive { kind: GameKind, channel: ChannelKey },

    /// Recruitment has ended, by deadline or cancellation
    #[error("Recruitment is closed")]
    RecruitmentClosed,

    /// User already joined this session
    #[error("User {0} already joined")]
    AlreadyJoined(UserId),

    /// Crew is at capacity
    #[error("Crew is full ({max} members)")]
    CrewFull { max: usize },

    /// Actor is not part of this session
    #[error("User {0} is not in this session")]
    NotAMember(UserId),

    /// It isn't this user's turn to act
    #[error("It is not user {0}'s turn")]
    OutOfTurn(UserId),

    /// The requested action is invalid in the current game state
    #[error("Invalid action in the current state: {0}")]
    InvalidAction(String),

    /// Ledger operation failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SessionError {
    /// A client-safe message that doesn't leak internal detail.
    pub fn client_message(&self) -> String {
        match self {
            SessionError::Ledger(err) => err.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
