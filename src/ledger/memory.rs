//! In-memory ledger store.
//!
//! Mirrors the Pg store's clamp and cooldown semantics behind a single
//! mutex, which gives the same per-account serialization guarantee. Used by
//! tests and by local runs without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::errors::{LedgerError, LedgerResult};
use super::models::{
    Account, BankAdjustment, DailyClaim, Item, UserId, DEFAULT_BANK_LIMIT, DEFAULT_LUCK,
    MAX_CURRENCY,
};
use super::store::LedgerStore;
use crate::config::DailyConfig;

#[derive(Debug, Clone)]
struct DailyState {
    streak: u32,
    claimed_at: DateTime<Utc>,
    next_claim_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<UserId, Account>,
    daily: HashMap<UserId, DailyState>,
}

impl Inner {
    fn account(&mut self, user_id: UserId) -> &mut Account {
        self.accounts
            .entry(user_id)
            .or_insert_with(|| Account::fresh(user_id))
    }
}

/// Ledger store backed by process memory.
#[derive(Default)]
pub struct MemoryLedgerStore {
    inner: Mutex<Inner>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn clamp_add(value: i64, delta: i64, max: i64) -> i64 {
    value.saturating_add(delta).clamp(0, max)
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn get_balance(&self, user_id: UserId) -> LedgerResult<Account> {
        let mut inner = self.inner.lock().await;
        Ok(inner.account(user_id).clone())
    }

    async fn adjust_pocket(&self, user_id: UserId, delta: i64) -> LedgerResult<i64> {
        let mut inner = self.inner.lock().await;
        let account = inner.account(user_id);
        account.pocket = clamp_add(account.pocket, delta, MAX_CURRENCY);
        account.updated_at = Utc::now();
        Ok(account.pocket)
    }

    async fn adjust_bank(&self, user_id: UserId, delta: i64) -> LedgerResult<BankAdjustment> {
        let mut inner = self.inner.lock().await;
        let account = inner.account(user_id);
        let new_bank = clamp_add(account.bank, delta, account.bank_limit);
        let amount = new_bank - account.bank;
        account.bank = new_bank;
        if amount != 0 {
            account.updated_at = Utc::now();
        }
        Ok(BankAdjustment {
            bank: new_bank,
            amount,
            applied: amount != 0,
        })
    }

    async fn set_bank_limit(&self, user_id: UserId, new_limit: i64) -> LedgerResult<()> {
        if new_limit <= 0 {
            return Err(LedgerError::InvalidAmount(new_limit));
        }
        let mut inner = self.inner.lock().await;
        let account = inner.account(user_id);
        account.bank_limit = new_limit;
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn set_luck(&self, user_id: UserId, new_luck: f64) -> LedgerResult<()> {
        let mut inner = self.inner.lock().await;
        let account = inner.account(user_id);
        account.luck = new_luck;
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn push_item(&self, user_id: UserId, item: Item) -> LedgerResult<()> {
        let mut inner = self.inner.lock().await;
        let account = inner.account(user_id);
        account.inventory.push(item);
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn reset_account(&self, user_id: UserId) -> LedgerResult<()> {
        let mut inner = self.inner.lock().await;
        let account = inner.account(user_id);
        account.pocket = 0;
        account.bank = 0;
        account.bank_limit = DEFAULT_BANK_LIMIT;
        account.luck = DEFAULT_LUCK;
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn deposit(&self, user_id: UserId, amount: i64) -> LedgerResult<BankAdjustment> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let mut inner = self.inner.lock().await;
        let account = inner.account(user_id);

        let headroom = account.bank_limit - account.bank;
        let applied = amount.min(headroom);
        if applied <= 0 {
            return Ok(BankAdjustment {
                bank: account.bank,
                amount: 0,
                applied: false,
            });
        }
        if account.pocket < applied {
            return Err(LedgerError::InsufficientBalance {
                available: account.pocket,
                required: applied,
            });
        }

        account.pocket -= applied;
        account.bank += applied;
        account.updated_at = Utc::now();
        Ok(BankAdjustment {
            bank: account.bank,
            amount: applied,
            applied: true,
        })
    }

    async fn withdraw(&self, user_id: UserId, amount: i64) -> LedgerResult<i64> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let mut inner = self.inner.lock().await;
        let account = inner.account(user_id);

        if account.bank < amount {
            return Err(LedgerError::InsufficientBalance {
                available: account.bank,
                required: amount,
            });
        }
        account.bank -= amount;
        account.pocket = clamp_add(account.pocket, amount, MAX_CURRENCY);
        account.updated_at = Utc::now();
        Ok(account.pocket)
    }

    async fn transfer_pocket(&self, from: UserId, to: UserId, amount: i64) -> LedgerResult<()> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if from == to {
            return Err(LedgerError::SelfTransfer(from));
        }
        let mut inner = self.inner.lock().await;

        let source = inner.account(from);
        if source.pocket < amount {
            return Err(LedgerError::InsufficientBalance {
                available: source.pocket,
                required: amount,
            });
        }
        source.pocket -= amount;
        source.updated_at = Utc::now();

        let dest = inner.account(to);
        dest.pocket = clamp_add(dest.pocket, amount, MAX_CURRENCY);
        dest.updated_at = Utc::now();
        Ok(())
    }

    async fn claim_daily(
        &self,
        user_id: UserId,
        config: &DailyConfig,
        base_amount: i64,
    ) -> LedgerResult<DailyClaim> {
        if base_amount <= 0 {
            return Err(LedgerError::InvalidAmount(base_amount));
        }
        let mut inner = self.inner.lock().await;

        let now = Utc::now();
        let mut streak = 1u32;
        if let Some(state) = inner.daily.get(&user_id) {
            if now < state.next_claim_at {
                return Err(LedgerError::DailyNotAvailable(state.next_claim_at));
            }
            if now - state.claimed_at <= config.streak_break {
                streak = state.streak + 1;
            }
        }

        let streak_bonus = (i64::from(streak) * config.streak_step).min(config.streak_bonus_cap);
        let total = base_amount + streak_bonus;

        let account = inner.account(user_id);
        account.pocket = clamp_add(account.pocket, total, MAX_CURRENCY);
        account.updated_at = now;

        let next_claim_at = now + config.cooldown;
        inner.daily.insert(
            user_id,
            DailyState {
                streak,
                claimed_at: now,
                next_claim_at,
            },
        );

        Ok(DailyClaim {
            user_id,
            base_amount,
            streak_bonus,
            streak,
            claimed_at: now,
            next_claim_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::models::ItemKind;

    #[tokio::test]
    async fn first_read_materializes_defaults() {
        let store = MemoryLedgerStore::new();
        let account = store.get_balance(1).await.unwrap();
        assert_eq!(account.pocket, 0);
        assert_eq!(account.bank_limit, DEFAULT_BANK_LIMIT);
    }

    #[tokio::test]
    async fn pocket_debit_clamps_at_zero() {
        let store = MemoryLedgerStore::new();
        store.adjust_pocket(1, 500).await.unwrap();
        let pocket = store.adjust_pocket(1, -2_000).await.unwrap();
        assert_eq!(pocket, 0);
    }

    #[tokio::test]
    async fn bank_credit_caps_at_limit() {
        let store = MemoryLedgerStore::new();
        let result = store.adjust_bank(1, 50_000).await.unwrap();
        assert_eq!(result.bank, DEFAULT_BANK_LIMIT);
        // Only the headroom landed, and the result says so.
        assert_eq!(result.amount, DEFAULT_BANK_LIMIT);
        assert!(result.applied);

        let again = store.adjust_bank(1, 1).await.unwrap();
        assert!(!again.applied);
        assert_eq!(again.amount, 0);
        assert_eq!(again.bank, DEFAULT_BANK_LIMIT);
    }

    #[tokio::test]
    async fn clamped_bank_debit_reports_the_amount_taken() {
        let store = MemoryLedgerStore::new();
        store.adjust_bank(1, 3_000).await.unwrap();

        let result = store.adjust_bank(1, -5_000).await.unwrap();
        assert_eq!(result.bank, 0);
        assert_eq!(result.amount, -3_000);
        assert!(result.applied);
    }

    #[tokio::test]
    async fn deposit_moves_only_headroom() {
        let store = MemoryLedgerStore::new();
        store.adjust_pocket(1, 20_000).await.unwrap();
        let result = store.deposit(1, 15_000).await.unwrap();
        assert_eq!(result.bank, DEFAULT_BANK_LIMIT);

        let account = store.get_balance(1).await.unwrap();
        assert_eq!(account.pocket, 10_000);
    }

    #[tokio::test]
    async fn withdraw_requires_bank_funds() {
        let store = MemoryLedgerStore::new();
        let err = store.withdraw(1, 100).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance {
                available: 0,
                required: 100
            }
        ));
    }

    #[tokio::test]
    async fn transfer_rejects_self() {
        let store = MemoryLedgerStore::new();
        let err = store.transfer_pocket(1, 1, 100).await.unwrap_err();
        assert!(matches!(err, LedgerError::SelfTransfer(1)));
    }

    #[tokio::test]
    async fn transfer_moves_between_pockets() {
        let store = MemoryLedgerStore::new();
        store.adjust_pocket(1, 1_000).await.unwrap();
        store.transfer_pocket(1, 2, 400).await.unwrap();

        assert_eq!(store.get_balance(1).await.unwrap().pocket, 600);
        assert_eq!(store.get_balance(2).await.unwrap().pocket, 400);
    }

    #[tokio::test]
    async fn daily_claim_enforces_cooldown() {
        let store = MemoryLedgerStore::new();
        let config = DailyConfig::default();

        let claim = store.claim_daily(1, &config, 1_500).await.unwrap();
        assert_eq!(claim.streak, 1);
        assert_eq!(claim.streak_bonus, 100);
        assert_eq!(store.get_balance(1).await.unwrap().pocket, 1_600);

        let err = store.claim_daily(1, &config, 1_500).await.unwrap_err();
        assert!(matches!(err, LedgerError::DailyNotAvailable(_)));
    }

    #[tokio::test]
    async fn reset_keeps_inventory() {
        let store = MemoryLedgerStore::new();
        store.adjust_pocket(1, 5_000).await.unwrap();
        store
            .push_item(1, Item::permanent(ItemKind::BankNote))
            .await
            .unwrap();

        store.reset_account(1).await.unwrap();
        let account = store.get_balance(1).await.unwrap();
        assert_eq!(account.pocket, 0);
        assert_eq!(account.inventory.len(), 1);
    }
}
