//! The `LedgerStore` trait: every balance mutation in the system funnels
//! through these operations.
//!
//! Implementations must serialize read-modify-write per account so that
//! concurrent adjustments for the same user are never lost. Callers are
//! responsible for sufficiency pre-checks; `adjust_pocket` clamps an
//! over-debit at zero rather than rejecting it.

use async_trait::async_trait;

use super::errors::LedgerResult;
use super::models::{Account, BankAdjustment, DailyClaim, Item, UserId};
use crate::config::DailyConfig;

/// Atomic per-account balance operations.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Fetch the account, creating a zeroed default if none exists yet.
    /// Never returns a partially populated record.
    async fn get_balance(&self, user_id: UserId) -> LedgerResult<Account>;

    /// Apply `pocket = clamp(pocket + delta, 0, MAX_CURRENCY)` and return the
    /// new value. A negative delta past zero clamps; it does not error.
    async fn adjust_pocket(&self, user_id: UserId, delta: i64) -> LedgerResult<i64>;

    /// Apply a bank delta. Credits are capped at the bank's remaining
    /// headroom; debits clamp at zero like pocket debits. The result
    /// carries the delta that actually landed, which callers splitting a
    /// debit must use instead of what they asked for.
    async fn adjust_bank(&self, user_id: UserId, delta: i64) -> LedgerResult<BankAdjustment>;

    /// Unconditional bank capacity write.
    async fn set_bank_limit(&self, user_id: UserId, new_limit: i64) -> LedgerResult<()>;

    /// Unconditional luck multiplier write.
    async fn set_luck(&self, user_id: UserId, new_luck: f64) -> LedgerResult<()>;

    /// Append an item to the account's inventory.
    async fn push_item(&self, user_id: UserId, item: Item) -> LedgerResult<()>;

    /// Zero pocket and bank, restore default limit and luck. Used by admin
    /// tooling and by the "lose everything" game penalty.
    async fn reset_account(&self, user_id: UserId) -> LedgerResult<()>;

    /// Move cash from pocket into the bank. The amount actually moved is
    /// capped at the bank's headroom; errors if the pocket can't cover it.
    async fn deposit(&self, user_id: UserId, amount: i64) -> LedgerResult<BankAdjustment>;

    /// Move cash from the bank into the pocket. Errors if the bank holds
    /// less than `amount`.
    async fn withdraw(&self, user_id: UserId, amount: i64) -> LedgerResult<i64>;

    /// Move pocket cash between two users. Errors if `from` can't cover it
    /// or the two sides are the same account.
    async fn transfer_pocket(&self, from: UserId, to: UserId, amount: i64) -> LedgerResult<()>;

    /// Claim the daily reward. `base_amount` is drawn by the caller; the
    /// store enforces the cooldown, tracks the streak, and credits
    /// `base_amount` plus the streak bonus to the pocket.
    async fn claim_daily(
        &self,
        user_id: UserId,
        config: &DailyConfig,
        base_amount: i64,
    ) -> LedgerResult<DailyClaim>;
}
