//! Duel: a cosmetic two-player state machine. No balance is at stake.
//!
//! Each round both fighters pick an action; the round resolves
//! simultaneously. A fighter who misses the action timeout forfeits the
//! round (the command layer submits `Forfeit` on their behalf), not the
//! match.

use log::info;
use std::fmt;
use std::sync::Arc;

use crate::config::DuelConfig;
use crate::interact::{mention, ReplyPayload};
use crate::ledger::{ChannelKey, UserId};
use crate::rng::WagerRng;
use crate::session::{GameKind, SessionError, SessionRegistry, SessionTicket};

use super::errors::{GameError, GameResult};

/// A fighter's choice for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelAction {
    Slash,
    Thrust,
    Block,
    /// Timed out or declined to act this round.
    Forfeit,
}

/// Terminal result of a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelOutcome {
    Winner(UserId),
    Draw,
}

/// What one resolved round looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u32,
    pub actions: [DuelAction; 2],
    /// Damage actually landed on each fighter after blocks.
    pub damage_taken: [i32; 2],
    pub health: [i32; 2],
    pub outcome: Option<DuelOutcome>,
}

impl RoundReport {
    pub fn render(&self, fighters: [UserId; 2]) -> ReplyPayload {
        let description = match self.outcome {
            Some(DuelOutcome::Winner(winner)) => {
                format!("{} wins the duel!", mention(winner))
            }
            Some(DuelOutcome::Draw) => "Both fighters fall. A draw!".to_string(),
            None => format!("Round {} resolved.", self.round),
        };
        ReplyPayload::new("Duel", description)
            .with_field(
                mention(fighters[0]),
                format!("{} HP (took {})", self.health[0], self.damage_taken[0]),
            )
            .with_field(
                mention(fighters[1]),
                format!("{} HP (took {})", self.health[1], self.damage_taken[1]),
            )
    }
}

/// Duel game service.
pub struct DuelGame {
    registry: Arc<SessionRegistry>,
    rng: Arc<dyn WagerRng>,
    config: DuelConfig,
}

impl DuelGame {
    pub fn new(
        registry: Arc<SessionRegistry>,
        rng: Arc<dyn WagerRng>,
        config: DuelConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry,
            rng,
            config,
        })
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    /// Claim the channel's duel slot and square the fighters off.
    pub async fn start(
        self: &Arc<Self>,
        channel: ChannelKey,
        challenger: UserId,
        opponent: UserId,
    ) -> GameResult<DuelMatch> {
        if challenger == opponent {
            return Err(GameError::SelfTarget);
        }
        let ticket = self.registry.try_begin(channel, GameKind::Duel).await?;
        info!(
            "Duel {} started in channel {channel}: {challenger} vs {opponent}",
            ticket.id
        );
        Ok(DuelMatch {
            game: self.clone(),
            ticket,
            fighters: [challenger, opponent],
            health: [self.config.max_health; 2],
            round: 0,
            finished: false,
        })
    }
}

/// An in-progress duel. A duel nobody finishes must be torn down with
/// [`DuelMatch::abort`] or the channel slot stays held.
pub struct DuelMatch {
    game: Arc<DuelGame>,
    ticket: SessionTicket,
    fighters: [UserId; 2],
    health: [i32; 2],
    round: u32,
    finished: bool,
}

impl fmt::Debug for DuelMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuelMatch")
            .field("ticket", &self.ticket)
            .field("fighters", &self.fighters)
            .field("health", &self.health)
            .field("round", &self.round)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl DuelMatch {
    pub fn fighters(&self) -> [UserId; 2] {
        self.fighters
    }

    pub fn health(&self) -> [i32; 2] {
        self.health
    }

    /// Resolve one round with both fighters' actions (index-aligned with
    /// `fighters()`). Attack rolls are drawn first (fighter 0 then 1), then
    /// block rolls in the same order.
    pub async fn play_round(&mut self, actions: [DuelAction; 2]) -> GameResult<RoundReport> {
        if self.finished {
            return Err(GameError::Session(SessionError::InvalidAction(
                "the duel is already over".to_string(),
            )));
        }
        self.round += 1;

        let raw = [self.attack_roll(actions[0]), self.attack_roll(actions[1])];
        let blocks = [self.block_roll(actions[0]), self.block_roll(actions[1])];

        // Fighter i takes the opponent's attack, reduced by their own block.
        let mut damage_taken = [0i32; 2];
        for i in 0..2 {
            let incoming = raw[1 - i];
            damage_taken[i] = (incoming - blocks[i]).max(0);
            self.health[i] = (self.health[i] - damage_taken[i]).max(0);
        }

        let outcome = match (self.health[0] == 0, self.health[1] == 0) {
            (true, true) => Some(DuelOutcome::Draw),
            (true, false) => Some(DuelOutcome::Winner(self.fighters[1])),
            (false, true) => Some(DuelOutcome::Winner(self.fighters[0])),
            (false, false) => None,
        };

        if let Some(outcome) = outcome {
            self.finished = true;
            self.game.registry.end(&self.ticket).await;
            info!("Duel {} finished after round {}: {outcome:?}", self.ticket.id, self.round);
        }

        Ok(RoundReport {
            round: self.round,
            actions,
            damage_taken,
            health: self.health,
            outcome,
        })
    }

    /// Call it off without a winner and release the channel slot. For the
    /// command layer's timeout/cleanup path; nothing is at stake.
    pub async fn abort(mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.game.registry.end(&self.ticket).await;
        info!("Duel {} abandoned after round {}", self.ticket.id, self.round);
    }

    fn attack_roll(&self, action: DuelAction) -> i32 {
        let config = &self.game.config;
        let base = match action {
            DuelAction::Slash => config.slash_damage,
            DuelAction::Thrust => config.thrust_damage,
            DuelAction::Block | DuelAction::Forfeit => return 0,
        };
        self.game.rng.amount(
            i64::from(base - config.damage_spread),
            i64::from(base + config.damage_spread),
        ) as i32
    }

    fn block_roll(&self, action: DuelAction) -> i32 {
        if action != DuelAction::Block {
            return 0;
        }
        let config = &self.game.config;
        self.game
            .rng
            .amount(i64::from(config.block_min), i64::from(config.block_max)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{Draw, ScriptedRng};

    fn duel_with(draws: Vec<Draw>) -> Arc<DuelGame> {
        DuelGame::new(
            Arc::new(SessionRegistry::new()),
            Arc::new(ScriptedRng::new(draws)),
            DuelConfig::default(),
        )
    }

    #[tokio::test]
    async fn block_absorbs_part_of_the_hit() {
        // Fighter 0 thrusts for 28; fighter 1 blocks 12 → takes 16.
        let game = duel_with(vec![Draw::Amount(28), Draw::Amount(12)]);
        let mut duel = game.start(1, 10, 20).await.unwrap();

        let report = duel
            .play_round([DuelAction::Thrust, DuelAction::Block])
            .await
            .unwrap();
        assert_eq!(report.damage_taken, [0, 16]);
        assert_eq!(report.health, [100, 84]);
        assert!(report.outcome.is_none());
    }

    #[tokio::test]
    async fn forfeit_takes_the_full_hit() {
        let game = duel_with(vec![Draw::Amount(25)]);
        let mut duel = game.start(1, 10, 20).await.unwrap();

        let report = duel
            .play_round([DuelAction::Slash, DuelAction::Forfeit])
            .await
            .unwrap();
        assert_eq!(report.damage_taken, [0, 25]);
    }

    #[tokio::test]
    async fn duel_ends_when_health_reaches_zero() {
        // Four thrusts of 30 each from fighter 0; fighter 1 never blocks.
        let mut draws = Vec::new();
        for _ in 0..4 {
            draws.push(Draw::Amount(30)); // fighter 0's attack
            draws.push(Draw::Amount(0)); // fighter 1's attack (slash for 0)
        }
        let game = duel_with(draws);
        let mut duel = game.start(1, 10, 20).await.unwrap();

        let mut last = None;
        for _ in 0..4 {
            last = duel
                .play_round([DuelAction::Thrust, DuelAction::Slash])
                .await
                .unwrap()
                .outcome;
        }
        assert_eq!(last, Some(DuelOutcome::Winner(10)));
        assert_eq!(duel.health(), [100, 0]);

        // Match is over and the channel slot is free.
        assert!(duel
            .play_round([DuelAction::Slash, DuelAction::Slash])
            .await
            .is_err());
        game.start(1, 10, 20).await.unwrap();
    }

    #[tokio::test]
    async fn simultaneous_knockouts_draw() {
        let game = duel_with(vec![Draw::Amount(100), Draw::Amount(100)]);
        let mut duel = game.start(1, 10, 20).await.unwrap();
        let report = duel
            .play_round([DuelAction::Thrust, DuelAction::Thrust])
            .await
            .unwrap();
        assert_eq!(report.outcome, Some(DuelOutcome::Draw));
    }

    #[tokio::test]
    async fn abandoned_duel_can_be_aborted_to_free_the_channel() {
        let game = duel_with(vec![]);
        let duel = game.start(1, 10, 20).await.unwrap();
        assert!(format!("{duel:?}").contains("DuelMatch"));

        assert!(matches!(
            game.start(1, 10, 20).await.unwrap_err(),
            GameError::Session(SessionError::AlreadyActive { .. })
        ));

        duel.abort().await;
        game.start(1, 10, 20).await.unwrap();
    }

    #[tokio::test]
    async fn self_duel_is_rejected() {
        let game = duel_with(vec![]);
        assert!(matches!(
            game.start(1, 10, 10).await.unwrap_err(),
            GameError::SelfTarget
        ));
    }
}
