//! Channel-scoped session registry.
//!
//! At most one session of each game kind may run per channel. Starting a
//! session takes the registry's write lock, so when two invocations race to
//! start, exactly one wins and the other gets `AlreadyActive`.

use chrono::{DateTime, Utc};
use log::info;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::ledger::ChannelKey;

use super::errors::{SessionError, SessionResult};

/// The games that hold channel sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Heist,
    Blackjack,
    Duel,
    Shootout,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameKind::Heist => "heist",
            GameKind::Blackjack => "blackjack",
            GameKind::Duel => "duel",
            GameKind::Shootout => "shootout",
        };
        write!(f, "{name}")
    }
}

/// Proof that a session slot is held. Ending a session requires the ticket,
/// so a stale task can't evict a newer session in the same slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    pub id: Uuid,
    pub channel: ChannelKey,
    pub kind: GameKind,
    pub started_at: DateTime<Utc>,
}

/// Registry of active sessions, keyed by channel and game kind.
#[derive(Default)]
pub struct SessionRegistry {
    active: RwLock<HashMap<(ChannelKey, GameKind), Uuid>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the session slot for `kind` in `channel`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyActive` when the slot is taken.
    pub async fn try_begin(
        &self,
        channel: ChannelKey,
        kind: GameKind,
    ) -> SessionResult<SessionTicket> {
        let mut active = self.active.write().await;
        if active.contains_key(&(channel, kind)) {
            return Err(SessionError::AlreadyActive { kind, channel });
        }

        let ticket = SessionTicket {
            id: Uuid::new_v4(),
            channel,
            kind,
            started_at: Utc::now(),
        };
        active.insert((channel, kind), ticket.id);
        info!("Started {kind} session {} in channel {channel}", ticket.id);
        Ok(ticket)
    }

    /// Release the slot held by `ticket`. A ticket that no longer matches the
    /// slot (already released, or superseded) is ignored.
    pub async fn end(&self, ticket: &SessionTicket) {
        let mut active = self.active.write().await;
        let key = (ticket.channel, ticket.kind);
        if active.get(&key) == Some(&ticket.id) {
            active.remove(&key);
            info!(
                "Ended {} session {} in channel {}",
                ticket.kind, ticket.id, ticket.channel
            );
        }
    }

    /// Whether a session of `kind` is running in `channel`.
    pub async fn is_active(&self, channel: ChannelKey, kind: GameKind) -> bool {
        self.active.read().await.contains_key(&(channel, kind))
    }

    /// Number of active sessions across all channels.
    pub async fn active_count(&self) -> usize {
        self.active.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_begin_in_same_slot_is_rejected() {
        let registry = SessionRegistry::new();
        let ticket = registry.try_begin(1, GameKind::Heist).await.unwrap();

        let err = registry.try_begin(1, GameKind::Heist).await.unwrap_err();
        assert!(matches!(err, SessionError::AlreadyActive { .. }));

        // Other kinds and other channels are independent slots.
        registry.try_begin(1, GameKind::Blackjack).await.unwrap();
        registry.try_begin(2, GameKind::Heist).await.unwrap();

        registry.end(&ticket).await;
        registry.try_begin(1, GameKind::Heist).await.unwrap();
    }

    #[tokio::test]
    async fn stale_ticket_does_not_evict_newer_session() {
        let registry = SessionRegistry::new();
        let stale = registry.try_begin(1, GameKind::Duel).await.unwrap();
        registry.end(&stale).await;

        let fresh = registry.try_begin(1, GameKind::Duel).await.unwrap();
        registry.end(&stale).await;
        assert!(registry.is_active(1, GameKind::Duel).await);

        registry.end(&fresh).await;
        assert!(!registry.is_active(1, GameKind::Duel).await);
    }

    #[tokio::test]
    async fn concurrent_begins_have_one_winner() {
        let registry = std::sync::Arc::new(SessionRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..50 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry.try_begin(9, GameKind::Shootout).await.is_ok()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(registry.active_count().await, 1);
    }
}
