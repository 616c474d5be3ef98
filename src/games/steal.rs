//! Steal: a single-shot wager against another user's pocket.
//!
//! Banked cash is immune; only pocket cash can be taken. Luck divides the
//! caught chance. A caught thief pays a fine that clamps at zero, so a broke
//! thief walks.

use log::info;
use std::sync::Arc;

use crate::config::StealConfig;
use crate::interact::{mention, ReplyPayload};
use crate::ledger::{LedgerStore, UserId};
use crate::rng::WagerRng;

use super::errors::{GameError, GameResult};

/// How an attempt went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StealOutcome {
    /// Took `amount` from the target's pocket.
    Success { target: UserId, amount: i64 },
    /// Caught; `fine` was the fine rolled, `paid` what the pocket covered.
    Caught { fine: i64, paid: i64 },
}

impl StealOutcome {
    pub fn render(&self) -> ReplyPayload {
        match self {
            StealOutcome::Success { target, amount } => ReplyPayload::new(
                "Steal",
                format!("You lifted {amount} from {}'s pocket!", mention(*target)),
            ),
            StealOutcome::Caught { fine, paid } => ReplyPayload::new(
                "Busted",
                format!("You were caught and fined {fine} (paid {paid})."),
            ),
        }
    }
}

/// Steal game service.
pub struct StealGame {
    store: Arc<dyn LedgerStore>,
    rng: Arc<dyn WagerRng>,
    config: StealConfig,
}

impl StealGame {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        rng: Arc<dyn WagerRng>,
        config: StealConfig,
    ) -> Arc<Self> {
        Arc::new(Self { store, rng, config })
    }

    pub async fn play(&self, thief: UserId, target: UserId) -> GameResult<StealOutcome> {
        if thief == target {
            return Err(GameError::SelfTarget);
        }

        let target_account = self.store.get_balance(target).await?;
        if target_account.has_active_shield(chrono::Utc::now()) {
            return Err(GameError::TargetShielded(target));
        }
        if target_account.pocket <= 0 {
            return Err(GameError::TargetBroke(target));
        }

        let thief_account = self.store.get_balance(thief).await?;
        let caught_chance = (self.config.caught_chance / thief_account.luck.max(0.01)).min(1.0);

        if self.rng.chance(caught_chance) {
            let fine = self.rng.amount(self.config.fine_min, self.config.fine_max);
            // Clamp at zero: the fine takes what the pocket has.
            let paid = fine.min(thief_account.pocket);
            self.store.adjust_pocket(thief, -fine).await?;
            info!("Steal: user {thief} caught targeting {target}, fined {fine} (paid {paid})");
            return Ok(StealOutcome::Caught { fine, paid });
        }

        let fraction = self
            .rng
            .fraction(self.config.take_fraction_min, self.config.take_fraction_max);
        let amount = ((target_account.pocket as f64 * fraction) as i64).max(1);

        self.store.adjust_pocket(target, -amount).await?;
        self.store.adjust_pocket(thief, amount).await?;
        info!("Steal: user {thief} took {amount} from user {target}");

        Ok(StealOutcome::Success { target, amount })
    }
}
