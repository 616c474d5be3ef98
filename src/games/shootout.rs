//! Shootout: the escalating-risk elimination game. Cosmetic only.
//!
//! One shell, eight chambers. Players alternate pulls; each pull hits with
//! probability 1/remaining, so the odds climb until someone loses. Before
//! each pull the barrel may swing toward the opponent.

use log::info;
use std::fmt;
use std::sync::Arc;

use crate::config::ShootoutConfig;
use crate::interact::{mention, ReplyPayload};
use crate::ledger::{ChannelKey, UserId};
use crate::rng::WagerRng;
use crate::session::{GameKind, SessionError, SessionRegistry, SessionTicket};

use super::errors::{GameError, GameResult};

/// What one trigger pull did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullReport {
    /// Whose turn it was.
    pub shooter: UserId,
    /// Who the barrel ended up pointing at.
    pub pointed_at: UserId,
    pub hit: bool,
    /// Chambers left after this pull (unchanged on a hit).
    pub remaining: u32,
    /// Set when the pull ended the match.
    pub winner: Option<UserId>,
}

impl PullReport {
    pub fn render(&self) -> ReplyPayload {
        let description = if self.hit {
            format!(
                "BANG. {} is out. {} takes it!",
                mention(self.pointed_at),
                self.winner.map(mention).unwrap_or_default()
            )
        } else {
            format!(
                "{} pulls the trigger at {}... click. {} chambers left.",
                mention(self.shooter),
                mention(self.pointed_at),
                self.remaining
            )
        };
        ReplyPayload::new("Shootout", description)
    }
}

/// Shootout game service.
pub struct ShootoutGame {
    registry: Arc<SessionRegistry>,
    rng: Arc<dyn WagerRng>,
    config: ShootoutConfig,
}

impl ShootoutGame {
    pub fn new(
        registry: Arc<SessionRegistry>,
        rng: Arc<dyn WagerRng>,
        config: ShootoutConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry,
            rng,
            config,
        })
    }

    /// Claim the channel's shootout slot and load the cylinder.
    pub async fn start(
        self: &Arc<Self>,
        channel: ChannelKey,
        challenger: UserId,
        opponent: UserId,
    ) -> GameResult<ShootoutMatch> {
        if challenger == opponent {
            return Err(GameError::SelfTarget);
        }
        let ticket = self.registry.try_begin(channel, GameKind::Shootout).await?;
        info!(
            "Shootout {} started in channel {channel}: {challenger} vs {opponent}",
            ticket.id
        );
        Ok(ShootoutMatch {
            game: self.clone(),
            ticket,
            players: [challenger, opponent],
            turn: 0,
            remaining: self.config.chambers.max(1),
            finished: false,
        })
    }
}

/// An in-progress shootout. A match nobody finishes must be torn down with
/// [`ShootoutMatch::abort`] or the channel slot stays held.
pub struct ShootoutMatch {
    game: Arc<ShootoutGame>,
    ticket: SessionTicket,
    players: [UserId; 2],
    turn: usize,
    remaining: u32,
    finished: bool,
}

impl fmt::Debug for ShootoutMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShootoutMatch")
            .field("ticket", &self.ticket)
            .field("players", &self.players)
            .field("turn", &self.turn)
            .field("remaining", &self.remaining)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl ShootoutMatch {
    pub fn players(&self) -> [UserId; 2] {
        self.players
    }

    /// Whose turn it is to pull.
    pub fn up_next(&self) -> UserId {
        self.players[self.turn]
    }

    pub fn chambers_remaining(&self) -> u32 {
        self.remaining
    }

    /// Pull the trigger for the current player. Draws the swing first, then
    /// the shot.
    pub async fn pull_trigger(&mut self) -> GameResult<PullReport> {
        if self.finished {
            return Err(GameError::Session(SessionError::InvalidAction(
                "the shootout is already over".to_string(),
            )));
        }

        let shooter = self.players[self.turn];
        let opponent = self.players[1 - self.turn];
        let pointed_at = if self.game.rng.chance(self.game.config.swing_chance) {
            opponent
        } else {
            shooter
        };

        let hit = self.game.rng.chance(1.0 / f64::from(self.remaining));
        let winner = if hit {
            self.finished = true;
            self.game.registry.end(&self.ticket).await;
            let survivor = if pointed_at == shooter { opponent } else { shooter };
            info!(
                "Shootout {} over after pull at {} chamber(s): {survivor} wins",
                self.ticket.id, self.remaining
            );
            Some(survivor)
        } else {
            self.remaining -= 1;
            self.turn = 1 - self.turn;
            None
        };

        Ok(PullReport {
            shooter,
            pointed_at,
            hit,
            remaining: self.remaining,
            winner,
        })
    }

    /// Call it off without a loser and release the channel slot. For the
    /// command layer's timeout/cleanup path; nothing is at stake.
    pub async fn abort(mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.game.registry.end(&self.ticket).await;
        info!(
            "Shootout {} abandoned with {} chamber(s) left",
            self.ticket.id, self.remaining
        );
    }
}
