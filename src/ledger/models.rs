//! Ledger data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identifier (chat platform snowflake).
pub type UserId = i64;

/// Channel/table identifier. Sessions are scoped to exactly one of these.
pub type ChannelKey = i64;

/// Largest representable balance. Credits clamp here instead of overflowing.
pub const MAX_CURRENCY: i64 = i64::MAX;

/// Bank capacity a fresh account starts with.
pub const DEFAULT_BANK_LIMIT: i64 = 10_000;

/// Luck multiplier a fresh account starts with.
pub const DEFAULT_LUCK: f64 = 1.0;

/// Per-user balance record.
///
/// Accounts are created implicitly with default values the first time they
/// are read or written, and are never deleted; reset operations zero the
/// fields instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub user_id: UserId,
    /// Spendable cash, at risk in wagers. `0..=MAX_CURRENCY`.
    pub pocket: i64,
    /// Protected cash. `0..=bank_limit`.
    pub bank: i64,
    /// Upper bound on `bank`; only ever increases.
    pub bank_limit: i64,
    /// Success-probability multiplier for steal/heist.
    pub luck: f64,
    /// Owned items, in acquisition order.
    pub inventory: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// A zeroed default for `user_id`, as materialized on first access.
    pub fn fresh(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            pocket: 0,
            bank: 0,
            bank_limit: DEFAULT_BANK_LIMIT,
            luck: DEFAULT_LUCK,
            inventory: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a theft shield in the inventory is still active at `now`.
    pub fn has_active_shield(&self, now: DateTime<Utc>) -> bool {
        self.inventory
            .iter()
            .any(|item| item.kind == ItemKind::TheftShield && item.expires_at.is_some_and(|t| t > now))
    }
}

/// Kinds of purchasable items that affect an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Raises `bank_limit` by 5,000 on purchase.
    BankNote,
    /// Multiplies `luck` by 1.2 on purchase.
    LuckBoost,
    /// Blocks steal/heist targeting until it expires.
    TheftShield,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::BankNote => write!(f, "bank_note"),
            ItemKind::LuckBoost => write!(f, "luck_boost"),
            ItemKind::TheftShield => write!(f, "theft_shield"),
        }
    }
}

/// An inventory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub acquired_at: DateTime<Utc>,
    /// Set for time-limited items (shields); `None` for permanent ones.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn permanent(kind: ItemKind) -> Self {
        Self {
            kind,
            acquired_at: Utc::now(),
            expires_at: None,
        }
    }

    pub fn expiring(kind: ItemKind, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            kind,
            acquired_at: now,
            expires_at: Some(now + ttl),
        }
    }
}

/// Result of a bank adjustment: the new balance, the delta that actually
/// landed (zero when a credit found no headroom, smaller in magnitude than
/// requested when a clamp kicked in), and whether anything changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankAdjustment {
    pub bank: i64,
    /// Signed delta applied to `bank`; negative for debits. Callers that
    /// redistribute a debit must use this, not the requested delta.
    pub amount: i64,
    pub applied: bool,
}

/// Receipt for a daily reward claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyClaim {
    pub user_id: UserId,
    /// Base reward before the streak bonus.
    pub base_amount: i64,
    pub streak_bonus: i64,
    /// Consecutive days claimed, including this one.
    pub streak: u32,
    pub claimed_at: DateTime<Utc>,
    pub next_claim_at: DateTime<Utc>,
}

impl DailyClaim {
    pub fn total(&self) -> i64 {
        self.base_amount + self.streak_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_account_defaults() {
        let account = Account::fresh(42);
        assert_eq!(account.pocket, 0);
        assert_eq!(account.bank, 0);
        assert_eq!(account.bank_limit, DEFAULT_BANK_LIMIT);
        assert_eq!(account.luck, DEFAULT_LUCK);
        assert!(account.inventory.is_empty());
    }

    #[test]
    fn shield_expiry() {
        let mut account = Account::fresh(1);
        assert!(!account.has_active_shield(Utc::now()));

        account
            .inventory
            .push(Item::expiring(ItemKind::TheftShield, chrono::Duration::hours(24)));
        assert!(account.has_active_shield(Utc::now()));
        assert!(!account.has_active_shield(Utc::now() + chrono::Duration::hours(25)));
    }

    #[test]
    fn permanent_items_never_shield() {
        let mut account = Account::fresh(1);
        account.inventory.push(Item::permanent(ItemKind::BankNote));
        assert!(!account.has_active_shield(Utc::now()));
    }
}
