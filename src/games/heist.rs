//! Heist: the multi-party wager.
//!
//! One user opens a heist against a target, a recruitment window collects a
//! crew (entry fee debited at join), and at the deadline the crew either
//! cracks the target's bank or is wiped out. Loot splits evenly; the integer
//! remainder is not distributed.

use log::{error, info, warn};
use std::fmt;
use std::sync::Arc;

use crate::config::HeistConfig;
use crate::interact::{mention, ReplyPayload};
use crate::ledger::{LedgerStore, UserId};
use crate::rng::WagerRng;
use crate::ledger::ChannelKey;
use crate::session::{GameKind, RecruitOutcome, Recruitment, SessionRegistry, SessionTicket};

use super::errors::{GameError, GameResult};

/// Heist game service.
pub struct HeistGame {
    store: Arc<dyn LedgerStore>,
    registry: Arc<SessionRegistry>,
    rng: Arc<dyn WagerRng>,
    config: HeistConfig,
}

/// How a heist ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeistOutcome {
    /// Too few crew at the deadline; every fee refunded.
    Cancelled { refunded: Vec<UserId> },
    /// The job went bad: every crew member's account was reset.
    Failed { crew: Vec<UserId> },
    /// The crew got in. Casualties forfeit their share and are reset.
    Success {
        target: UserId,
        loot: i64,
        share: i64,
        survivors: Vec<UserId>,
        casualties: Vec<UserId>,
        target_bank_after: i64,
    },
}

impl HeistOutcome {
    pub fn render(&self) -> ReplyPayload {
        match self {
            HeistOutcome::Cancelled { refunded } => ReplyPayload::new(
                "Heist called off",
                "Not enough crew showed up. Entry fees refunded.",
            )
            .with_field("Refunded", join_mentions(refunded)),
            HeistOutcome::Failed { crew } => ReplyPayload::new(
                "Heist failed",
                "The alarm tripped. The whole crew was caught and lost everything.",
            )
            .with_field("Caught", join_mentions(crew)),
            HeistOutcome::Success {
                target,
                loot,
                share,
                survivors,
                casualties,
                ..
            } => {
                let mut payload = ReplyPayload::new(
                    "Heist succeeded",
                    format!("The crew cracked {}'s vault for {loot}!", mention(*target)),
                )
                .with_field("Share", share.to_string())
                .with_field("Survivors", join_mentions(survivors));
                if !casualties.is_empty() {
                    payload = payload.with_field("Didn't make it", join_mentions(casualties));
                }
                payload
            }
        }
    }
}

fn join_mentions(users: &[UserId]) -> String {
    if users.is_empty() {
        return "nobody".to_string();
    }
    users
        .iter()
        .map(|&u| mention(u))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One pending heist: the registry slot, the recruitment drive, and the
/// target picked at start.
pub struct HeistSession {
    game: Arc<HeistGame>,
    ticket: SessionTicket,
    recruitment: Recruitment,
    target: UserId,
}

impl fmt::Debug for HeistSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeistSession")
            .field("ticket", &self.ticket)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl HeistGame {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        registry: Arc<SessionRegistry>,
        rng: Arc<dyn WagerRng>,
        config: HeistConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            registry,
            rng,
            config,
        })
    }

    pub fn config(&self) -> &HeistConfig {
        &self.config
    }

    /// Open a heist against `target` in `channel`, charging the initiator's
    /// entry fee and claiming the channel's heist slot.
    pub async fn start(
        self: &Arc<Self>,
        channel: ChannelKey,
        initiator: UserId,
        target: UserId,
    ) -> GameResult<HeistSession> {
        if initiator == target {
            return Err(GameError::SelfTarget);
        }

        let target_account = self.store.get_balance(target).await?;
        if target_account.has_active_shield(chrono::Utc::now()) {
            return Err(GameError::TargetShielded(target));
        }
        if target_account.bank <= 0 {
            return Err(GameError::TargetBroke(target));
        }

        let ticket = self.registry.try_begin(channel, GameKind::Heist).await?;
        let recruitment = match Recruitment::open(
            self.store.clone(),
            initiator,
            self.config.entry_fee,
            self.config.min_crew,
            self.config.max_crew,
            self.config.window,
        )
        .await
        {
            Ok(recruitment) => recruitment,
            Err(err) => {
                // Couldn't charge the initiator; give the slot back.
                self.registry.end(&ticket).await;
                return Err(err.into());
            }
        };

        info!("Heist opened in channel {channel} by user {initiator} against user {target}");
        Ok(HeistSession {
            game: self.clone(),
            ticket,
            recruitment,
            target,
        })
    }
}

impl HeistSession {
    pub fn target(&self) -> UserId {
        self.target
    }

    pub async fn crew(&self) -> Vec<UserId> {
        self.recruitment.members().await
    }

    /// Join the crew. The target can't rob themselves.
    pub async fn join(&self, user_id: UserId) -> GameResult<usize> {
        if user_id == self.target {
            return Err(GameError::SelfTarget);
        }
        Ok(self.recruitment.join(user_id).await?)
    }

    /// Wait out the recruitment window, then resolve and free the channel
    /// slot. Call once; a second call gets `RecruitmentClosed`.
    pub async fn run(&self) -> GameResult<HeistOutcome> {
        tokio::time::sleep_until(self.recruitment.deadline()).await;
        self.resolve_now().await
    }

    /// Close recruitment and resolve immediately.
    pub async fn resolve_now(&self) -> GameResult<HeistOutcome> {
        let result = self.resolve_inner().await;
        self.game.registry.end(&self.ticket).await;
        result
    }

    async fn resolve_inner(&self) -> GameResult<HeistOutcome> {
        let crew = match self.recruitment.close().await? {
            RecruitOutcome::Cancelled { refunded } => {
                info!(
                    "Heist session {} cancelled with {} member(s)",
                    self.ticket.id,
                    refunded.len()
                );
                return Ok(HeistOutcome::Cancelled { refunded });
            }
            RecruitOutcome::Locked { crew } => crew,
        };

        let game = &self.game;
        let config = &game.config;

        // Average crew luck scales the success chance.
        let mut luck_sum = 0.0;
        for &member in &crew {
            luck_sum += game.store.get_balance(member).await?.luck;
        }
        let crew_luck = luck_sum / crew.len() as f64;
        let chance = ((config.base_chance + config.per_member_bonus * crew.len() as f64)
            * crew_luck)
            .min(config.max_chance);

        if !game.rng.chance(chance) {
            let mut failed_resets = 0usize;
            for &member in &crew {
                if let Err(err) = game.store.reset_account(member).await {
                    failed_resets += 1;
                    error!(
                        "Heist session {} reset failed for user {member}: {err}",
                        self.ticket.id
                    );
                }
            }
            if failed_resets > 0 {
                warn!(
                    "Heist session {} left {failed_resets} unsettled reset(s)",
                    self.ticket.id
                );
                return Err(GameError::PayoutIncomplete {
                    failed: failed_resets,
                    total: crew.len(),
                });
            }
            info!(
                "Heist session {} failed (chance {chance:.2}), {} crew reset",
                self.ticket.id,
                crew.len()
            );
            return Ok(HeistOutcome::Failed { crew });
        }

        // Target state is re-read at resolution time, never from a snapshot
        // taken at recruitment start.
        let target_account = game.store.get_balance(self.target).await?;
        let fraction = game
            .rng
            .fraction(config.loot_fraction_min, config.loot_fraction_max);
        let requested = (target_account.bank as f64 * fraction) as i64;
        let taken = game.store.adjust_bank(self.target, -requested).await?;

        // Split what actually left the vault. A withdrawal landing between
        // the balance read and the debit shrinks it below the requested cut.
        let loot = -taken.amount;
        let share = loot / crew.len() as i64;
        let mut survivors = Vec::new();
        let mut casualties = Vec::new();
        let mut failed_payouts = 0usize;

        for &member in &crew {
            let payout = if game.rng.chance(config.survival_chance) {
                survivors.push(member);
                game.store.adjust_pocket(member, share).await.map(|_| ())
            } else {
                casualties.push(member);
                game.store.reset_account(member).await
            };
            if let Err(err) = payout {
                failed_payouts += 1;
                error!(
                    "Heist session {} payout failed for user {member} (share {share}): {err}",
                    self.ticket.id
                );
            }
        }

        if failed_payouts > 0 {
            warn!(
                "Heist session {} left {failed_payouts} unsettled payout(s)",
                self.ticket.id
            );
            return Err(GameError::PayoutIncomplete {
                failed: failed_payouts,
                total: crew.len(),
            });
        }

        info!(
            "Heist session {} succeeded: loot {loot}, share {share}, {} survivor(s)",
            self.ticket.id,
            survivors.len()
        );
        Ok(HeistOutcome::Success {
            target: self.target,
            loot,
            share,
            survivors,
            casualties,
            target_bank_after: taken.bank,
        })
    }
}
