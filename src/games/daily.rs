//! Daily reward flow: draw a base amount, let the store enforce the
//! cooldown and streak.

use log::info;
use std::sync::Arc;

use crate::config::DailyConfig;
use crate::interact::ReplyPayload;
use crate::ledger::{DailyClaim, LedgerStore, UserId};
use crate::rng::WagerRng;

use super::errors::GameResult;

/// Daily reward service.
pub struct DailyReward {
    store: Arc<dyn LedgerStore>,
    rng: Arc<dyn WagerRng>,
    config: DailyConfig,
}

impl DailyReward {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        rng: Arc<dyn WagerRng>,
        config: DailyConfig,
    ) -> Arc<Self> {
        Arc::new(Self { store, rng, config })
    }

    pub async fn claim(&self, user: UserId) -> GameResult<DailyClaim> {
        let base = self.rng.amount(self.config.base_min, self.config.base_max);
        let claim = self.store.claim_daily(user, &self.config, base).await?;
        info!(
            "User {user} claimed daily: base {base}, streak {} (+{})",
            claim.streak, claim.streak_bonus
        );
        Ok(claim)
    }
}

/// Render a claim receipt.
pub fn render_claim(claim: &DailyClaim) -> ReplyPayload {
    ReplyPayload::new(
        "Daily reward",
        format!("You collected {} today.", claim.total()),
    )
    .with_field("Base", claim.base_amount.to_string())
    .with_field(
        "Streak",
        format!("day {} (+{})", claim.streak, claim.streak_bonus),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerError, MemoryLedgerStore};
    use crate::rng::{Draw, ScriptedRng};
    use super::super::errors::GameError;

    #[tokio::test]
    async fn claim_credits_base_plus_streak() {
        let store = Arc::new(MemoryLedgerStore::new());
        let reward = DailyReward::new(
            store.clone(),
            Arc::new(ScriptedRng::new([Draw::Amount(2_000)])),
            DailyConfig::default(),
        );

        let claim = reward.claim(1).await.unwrap();
        assert_eq!(claim.base_amount, 2_000);
        assert_eq!(claim.streak_bonus, 100);
        assert_eq!(store.get_balance(1).await.unwrap().pocket, 2_100);
    }

    #[tokio::test]
    async fn second_claim_hits_the_cooldown() {
        let store = Arc::new(MemoryLedgerStore::new());
        let reward = DailyReward::new(
            store.clone(),
            Arc::new(ScriptedRng::new([Draw::Amount(1_000), Draw::Amount(1_000)])),
            DailyConfig::default(),
        );

        reward.claim(1).await.unwrap();
        let err = reward.claim(1).await.unwrap_err();
        assert!(matches!(
            err,
            GameError::Ledger(LedgerError::DailyNotAvailable(_))
        ));
    }
}
