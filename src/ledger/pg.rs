//! PostgreSQL-backed ledger store.
//!
//! Per-account serialization comes from the database: every mutation is
//! either a single conditional UPDATE or a short transaction that takes the
//! account row lock (`SELECT ... FOR UPDATE`) before computing the new
//! values, so two concurrent adjustments for the same user can never lose
//! an update.
//!
//! Schema (see [`PgLedgerStore::ensure_schema`]):
//!
//! ```sql
//! CREATE TABLE accounts (
//!     user_id    BIGINT PRIMARY KEY,
//!     pocket     BIGINT NOT NULL DEFAULT 0,
//!     bank       BIGINT NOT NULL DEFAULT 0,
//!     bank_limit BIGINT NOT NULL DEFAULT 10000,
//!     luck       DOUBLE PRECISION NOT NULL DEFAULT 1.0,
//!     inventory  TEXT NOT NULL DEFAULT '[]',
//!     created_at TIMESTAMP NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMP NOT NULL DEFAULT NOW()
//! );
//! CREATE TABLE daily_claims (
//!     id            BIGSERIAL PRIMARY KEY,
//!     user_id       BIGINT NOT NULL,
//!     amount        BIGINT NOT NULL,
//!     streak        INT NOT NULL,
//!     claimed_at    TIMESTAMP NOT NULL,
//!     next_claim_at TIMESTAMP NOT NULL
//! );
//! CREATE TABLE ledger_ops (
//!     op_id      UUID PRIMARY KEY,
//!     amount     BIGINT NOT NULL,
//!     applied_at TIMESTAMP NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! `ledger_ops` is the idempotency journal. Every non-idempotent write is
//! keyed by a fresh UUID, recorded in the same transaction as its effect;
//! when a retry follows a lost commit acknowledgement, the key is already
//! journaled and the write replays as a read.

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{LedgerError, LedgerResult};
use super::models::{
    Account, BankAdjustment, DailyClaim, Item, UserId, DEFAULT_BANK_LIMIT, DEFAULT_LUCK,
};
use super::retry::RetryPolicy;
use super::store::LedgerStore;
use crate::config::DailyConfig;

/// Ledger store over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: Arc<PgPool>,
    retry: RetryPolicy,
}

impl PgLedgerStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(pool: Arc<PgPool>, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    /// Create the ledger tables and indexes if they don't exist yet.
    pub async fn ensure_schema(&self) -> LedgerResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                user_id    BIGINT PRIMARY KEY,
                pocket     BIGINT NOT NULL DEFAULT 0,
                bank       BIGINT NOT NULL DEFAULT 0,
                bank_limit BIGINT NOT NULL DEFAULT 10000,
                luck       DOUBLE PRECISION NOT NULL DEFAULT 1.0,
                inventory  TEXT NOT NULL DEFAULT '[]',
                created_at TIMESTAMP NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS daily_claims (
                id            BIGSERIAL PRIMARY KEY,
                user_id       BIGINT NOT NULL,
                amount        BIGINT NOT NULL,
                streak        INT NOT NULL,
                claimed_at    TIMESTAMP NOT NULL,
                next_claim_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_daily_claims_user
             ON daily_claims (user_id, claimed_at DESC)",
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ledger_ops (
                op_id      UUID PRIMARY KEY,
                amount     BIGINT NOT NULL,
                applied_at TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        info!("Ledger schema ready");
        Ok(())
    }

    /// Materialize the default account row if the user has none yet.
    async fn ensure_account<'a>(
        tx: &mut Transaction<'a, Postgres>,
        user_id: UserId,
    ) -> LedgerResult<()> {
        sqlx::query("INSERT INTO accounts (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// The journaled amount for `op_id`, if a previous attempt of this
    /// operation already committed.
    async fn replayed_amount<'a>(
        tx: &mut Transaction<'a, Postgres>,
        op_id: Uuid,
    ) -> LedgerResult<Option<i64>> {
        let row = sqlx::query("SELECT amount FROM ledger_ops WHERE op_id = $1")
            .bind(op_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.map(|r| r.get("amount")))
    }

    /// Journal `op_id` in the transaction that carries its effect.
    async fn record_op<'a>(
        tx: &mut Transaction<'a, Postgres>,
        op_id: Uuid,
        amount: i64,
    ) -> LedgerResult<()> {
        sqlx::query("INSERT INTO ledger_ops (op_id, amount) VALUES ($1, $2)")
            .bind(op_id)
            .bind(amount)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    fn account_from_row(row: &sqlx::postgres::PgRow) -> LedgerResult<Account> {
        let user_id: UserId = row.get("user_id");
        let raw_inventory: String = row.get("inventory");
        let inventory: Vec<Item> = serde_json::from_str(&raw_inventory)
            .map_err(|source| LedgerError::CorruptInventory { user_id, source })?;

        Ok(Account {
            user_id,
            pocket: row.get("pocket"),
            bank: row.get("bank"),
            bank_limit: row.get("bank_limit"),
            luck: row.get("luck"),
            inventory,
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
            updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
        })
    }

    async fn get_balance_inner(&self, user_id: UserId) -> LedgerResult<Account> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_account(&mut tx, user_id).await?;

        let row = sqlx::query(
            "SELECT user_id, pocket, bank, bank_limit, luck, inventory, created_at, updated_at
             FROM accounts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Self::account_from_row(&row)
    }

    async fn adjust_pocket_inner(
        &self,
        user_id: UserId,
        delta: i64,
        op_id: Uuid,
    ) -> LedgerResult<i64> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_account(&mut tx, user_id).await?;

        if Self::replayed_amount(&mut tx, op_id).await?.is_some() {
            let row = sqlx::query("SELECT pocket FROM accounts WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
            tx.commit().await?;
            return Ok(row.get("pocket"));
        }

        // Clamp in NUMERIC so a delta near i64::MAX can't overflow the
        // bigint addition before LEAST applies.
        let row = sqlx::query(
            "UPDATE accounts
             SET pocket = LEAST(9223372036854775807::NUMERIC,
                                GREATEST(0::NUMERIC, pocket::NUMERIC + $1::NUMERIC))::BIGINT,
                 updated_at = NOW()
             WHERE user_id = $2
             RETURNING pocket",
        )
        .bind(delta)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        Self::record_op(&mut tx, op_id, delta).await?;
        tx.commit().await?;

        Ok(row.get("pocket"))
    }

    async fn adjust_bank_inner(
        &self,
        user_id: UserId,
        delta: i64,
        op_id: Uuid,
    ) -> LedgerResult<BankAdjustment> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_account(&mut tx, user_id).await?;

        let row = sqlx::query("SELECT bank, bank_limit FROM accounts WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        let bank: i64 = row.get("bank");
        let bank_limit: i64 = row.get("bank_limit");

        if let Some(amount) = Self::replayed_amount(&mut tx, op_id).await? {
            tx.commit().await?;
            return Ok(BankAdjustment {
                bank,
                amount,
                applied: amount != 0,
            });
        }

        let new_bank = if delta >= 0 {
            bank.saturating_add(delta.min(bank_limit - bank))
        } else {
            bank.saturating_add(delta).max(0)
        };
        let amount = new_bank - bank;

        if amount == 0 {
            Self::record_op(&mut tx, op_id, 0).await?;
            tx.commit().await?;
            return Ok(BankAdjustment {
                bank,
                amount: 0,
                applied: false,
            });
        }

        sqlx::query("UPDATE accounts SET bank = $1, updated_at = NOW() WHERE user_id = $2")
            .bind(new_bank)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        Self::record_op(&mut tx, op_id, amount).await?;
        tx.commit().await?;

        Ok(BankAdjustment {
            bank: new_bank,
            amount,
            applied: true,
        })
    }

    async fn push_item_inner(&self, user_id: UserId, item: &Item, op_id: Uuid) -> LedgerResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_account(&mut tx, user_id).await?;

        if Self::replayed_amount(&mut tx, op_id).await?.is_some() {
            tx.commit().await?;
            return Ok(());
        }

        let row = sqlx::query("SELECT inventory FROM accounts WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        let raw: String = row.get("inventory");
        let mut inventory: Vec<Item> = serde_json::from_str(&raw)
            .map_err(|source| LedgerError::CorruptInventory { user_id, source })?;
        inventory.push(item.clone());

        let encoded = serde_json::to_string(&inventory)
            .map_err(|source| LedgerError::CorruptInventory { user_id, source })?;
        sqlx::query("UPDATE accounts SET inventory = $1, updated_at = NOW() WHERE user_id = $2")
            .bind(encoded)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        Self::record_op(&mut tx, op_id, 0).await?;
        tx.commit().await?;

        info!("Added {} to inventory for user {user_id}", item.kind);
        Ok(())
    }

    // Absolute write; retrying it lands on the same row values, so it
    // carries no idempotency key.
    async fn reset_account_inner(&self, user_id: UserId) -> LedgerResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_account(&mut tx, user_id).await?;

        sqlx::query(
            "UPDATE accounts
             SET pocket = 0, bank = 0, bank_limit = $1, luck = $2, updated_at = NOW()
             WHERE user_id = $3",
        )
        .bind(DEFAULT_BANK_LIMIT)
        .bind(DEFAULT_LUCK)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!("Reset account for user {user_id}");
        Ok(())
    }

    async fn deposit_inner(
        &self,
        user_id: UserId,
        amount: i64,
        op_id: Uuid,
    ) -> LedgerResult<BankAdjustment> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_account(&mut tx, user_id).await?;

        let row = sqlx::query(
            "SELECT pocket, bank, bank_limit FROM accounts WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        let pocket: i64 = row.get("pocket");
        let bank: i64 = row.get("bank");
        let bank_limit: i64 = row.get("bank_limit");

        if let Some(moved) = Self::replayed_amount(&mut tx, op_id).await? {
            tx.commit().await?;
            return Ok(BankAdjustment {
                bank,
                amount: moved,
                applied: moved != 0,
            });
        }

        let headroom = bank_limit - bank;
        let applied = amount.min(headroom);
        if applied <= 0 {
            Self::record_op(&mut tx, op_id, 0).await?;
            tx.commit().await?;
            return Ok(BankAdjustment {
                bank,
                amount: 0,
                applied: false,
            });
        }
        if pocket < applied {
            return Err(LedgerError::InsufficientBalance {
                available: pocket,
                required: applied,
            });
        }

        sqlx::query(
            "UPDATE accounts
             SET pocket = pocket - $1, bank = bank + $1, updated_at = NOW()
             WHERE user_id = $2",
        )
        .bind(applied)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        Self::record_op(&mut tx, op_id, applied).await?;
        tx.commit().await?;

        Ok(BankAdjustment {
            bank: bank + applied,
            amount: applied,
            applied: true,
        })
    }

    async fn withdraw_inner(&self, user_id: UserId, amount: i64, op_id: Uuid) -> LedgerResult<i64> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_account(&mut tx, user_id).await?;

        if Self::replayed_amount(&mut tx, op_id).await?.is_some() {
            let row = sqlx::query("SELECT pocket FROM accounts WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
            tx.commit().await?;
            return Ok(row.get("pocket"));
        }

        // Atomic conditional debit; no row means the bank can't cover it.
        let updated = sqlx::query(
            "UPDATE accounts
             SET bank = bank - $1,
                 pocket = LEAST(9223372036854775807::NUMERIC,
                                pocket::NUMERIC + $1::NUMERIC)::BIGINT,
                 updated_at = NOW()
             WHERE user_id = $2 AND bank >= $1
             RETURNING pocket",
        )
        .bind(amount)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        match updated {
            Some(row) => {
                Self::record_op(&mut tx, op_id, amount).await?;
                tx.commit().await?;
                Ok(row.get("pocket"))
            }
            None => {
                let row = sqlx::query("SELECT bank FROM accounts WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_one(&mut *tx)
                    .await?;
                Err(LedgerError::InsufficientBalance {
                    available: row.get("bank"),
                    required: amount,
                })
            }
        }
    }

    async fn transfer_pocket_inner(
        &self,
        from: UserId,
        to: UserId,
        amount: i64,
        op_id: Uuid,
    ) -> LedgerResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_account(&mut tx, from).await?;
        Self::ensure_account(&mut tx, to).await?;

        if Self::replayed_amount(&mut tx, op_id).await?.is_some() {
            tx.commit().await?;
            return Ok(());
        }

        let debited = sqlx::query(
            "UPDATE accounts
             SET pocket = pocket - $1, updated_at = NOW()
             WHERE user_id = $2 AND pocket >= $1
             RETURNING pocket",
        )
        .bind(amount)
        .bind(from)
        .fetch_optional(&mut *tx)
        .await?;

        if debited.is_none() {
            let row = sqlx::query("SELECT pocket FROM accounts WHERE user_id = $1")
                .bind(from)
                .fetch_one(&mut *tx)
                .await?;
            return Err(LedgerError::InsufficientBalance {
                available: row.get("pocket"),
                required: amount,
            });
        }

        sqlx::query(
            "UPDATE accounts
             SET pocket = LEAST(9223372036854775807::NUMERIC,
                                pocket::NUMERIC + $1::NUMERIC)::BIGINT,
                 updated_at = NOW()
             WHERE user_id = $2",
        )
        .bind(amount)
        .bind(to)
        .execute(&mut *tx)
        .await?;
        Self::record_op(&mut tx, op_id, amount).await?;
        tx.commit().await?;

        info!("Transferred {amount} from user {from} to user {to}");
        Ok(())
    }

    async fn claim_daily_inner(
        &self,
        user_id: UserId,
        config: &DailyConfig,
        base_amount: i64,
        op_id: Uuid,
    ) -> LedgerResult<DailyClaim> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_account(&mut tx, user_id).await?;

        // The account row lock serializes concurrent claims, including two
        // first-ever claims racing before any claim row exists.
        sqlx::query("SELECT user_id FROM accounts WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if Self::replayed_amount(&mut tx, op_id).await?.is_some() {
            // The claim landed on an earlier attempt; rebuild its receipt
            // instead of tripping the cooldown we just created.
            let row = sqlx::query(
                "SELECT amount, streak, claimed_at, next_claim_at FROM daily_claims
                 WHERE user_id = $1
                 ORDER BY claimed_at DESC
                 LIMIT 1",
            )
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
            tx.commit().await?;

            let streak = row.get::<i32, _>("streak") as u32;
            let total: i64 = row.get("amount");
            let streak_bonus =
                (i64::from(streak) * config.streak_step).min(config.streak_bonus_cap);
            return Ok(DailyClaim {
                user_id,
                base_amount: total - streak_bonus,
                streak_bonus,
                streak,
                claimed_at: row.get::<chrono::NaiveDateTime, _>("claimed_at").and_utc(),
                next_claim_at: row
                    .get::<chrono::NaiveDateTime, _>("next_claim_at")
                    .and_utc(),
            });
        }

        let last = sqlx::query(
            "SELECT streak, claimed_at, next_claim_at FROM daily_claims
             WHERE user_id = $1
             ORDER BY claimed_at DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let now = Utc::now();
        let mut streak = 1u32;
        if let Some(row) = &last {
            let next_claim_at = row
                .get::<chrono::NaiveDateTime, _>("next_claim_at")
                .and_utc();
            if now < next_claim_at {
                return Err(LedgerError::DailyNotAvailable(next_claim_at));
            }
            let claimed_at = row.get::<chrono::NaiveDateTime, _>("claimed_at").and_utc();
            if now - claimed_at <= config.streak_break {
                streak = row.get::<i32, _>("streak") as u32 + 1;
            }
        }

        let streak_bonus = (i64::from(streak) * config.streak_step).min(config.streak_bonus_cap);
        let total = base_amount + streak_bonus;

        sqlx::query(
            "UPDATE accounts
             SET pocket = LEAST(9223372036854775807::NUMERIC,
                                pocket::NUMERIC + $1::NUMERIC)::BIGINT,
                 updated_at = NOW()
             WHERE user_id = $2",
        )
        .bind(total)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let next_claim_at = now + config.cooldown;
        sqlx::query(
            "INSERT INTO daily_claims (user_id, amount, streak, claimed_at, next_claim_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user_id)
        .bind(total)
        .bind(streak as i32)
        .bind(now.naive_utc())
        .bind(next_claim_at.naive_utc())
        .execute(&mut *tx)
        .await?;
        Self::record_op(&mut tx, op_id, total).await?;
        tx.commit().await?;

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

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn get_balance(&self, user_id: UserId) -> LedgerResult<Account> {
        self.retry
            .run("ledger.get_balance", || self.get_balance_inner(user_id))
            .await
    }

    async fn adjust_pocket(&self, user_id: UserId, delta: i64) -> LedgerResult<i64> {
        // One key per logical adjustment, shared across retry attempts.
        let op_id = Uuid::new_v4();
        self.retry
            .run("ledger.adjust_pocket", || {
                self.adjust_pocket_inner(user_id, delta, op_id)
            })
            .await
    }

    async fn adjust_bank(&self, user_id: UserId, delta: i64) -> LedgerResult<BankAdjustment> {
        let op_id = Uuid::new_v4();
        self.retry
            .run("ledger.adjust_bank", || {
                self.adjust_bank_inner(user_id, delta, op_id)
            })
            .await
    }

    async fn set_bank_limit(&self, user_id: UserId, new_limit: i64) -> LedgerResult<()> {
        if new_limit <= 0 {
            return Err(LedgerError::InvalidAmount(new_limit));
        }
        self.retry
            .run("ledger.set_bank_limit", || async move {
                sqlx::query(
                    "INSERT INTO accounts (user_id, bank_limit) VALUES ($1, $2)
                     ON CONFLICT (user_id)
                     DO UPDATE SET bank_limit = EXCLUDED.bank_limit, updated_at = NOW()",
                )
                .bind(user_id)
                .bind(new_limit)
                .execute(self.pool.as_ref())
                .await?;
                Ok(())
            })
            .await
    }

    async fn set_luck(&self, user_id: UserId, new_luck: f64) -> LedgerResult<()> {
        self.retry
            .run("ledger.set_luck", || async move {
                sqlx::query(
                    "INSERT INTO accounts (user_id, luck) VALUES ($1, $2)
                     ON CONFLICT (user_id)
                     DO UPDATE SET luck = EXCLUDED.luck, updated_at = NOW()",
                )
                .bind(user_id)
                .bind(new_luck)
                .execute(self.pool.as_ref())
                .await?;
                Ok(())
            })
            .await
    }

    async fn push_item(&self, user_id: UserId, item: Item) -> LedgerResult<()> {
        let op_id = Uuid::new_v4();
        self.retry
            .run("ledger.push_item", || {
                self.push_item_inner(user_id, &item, op_id)
            })
            .await
    }

    async fn reset_account(&self, user_id: UserId) -> LedgerResult<()> {
        self.retry
            .run("ledger.reset_account", || self.reset_account_inner(user_id))
            .await
    }

    async fn deposit(&self, user_id: UserId, amount: i64) -> LedgerResult<BankAdjustment> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let op_id = Uuid::new_v4();
        self.retry
            .run("ledger.deposit", || {
                self.deposit_inner(user_id, amount, op_id)
            })
            .await
    }

    async fn withdraw(&self, user_id: UserId, amount: i64) -> LedgerResult<i64> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let op_id = Uuid::new_v4();
        self.retry
            .run("ledger.withdraw", || {
                self.withdraw_inner(user_id, amount, op_id)
            })
            .await
    }

    async fn transfer_pocket(&self, from: UserId, to: UserId, amount: i64) -> LedgerResult<()> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if from == to {
            return Err(LedgerError::SelfTransfer(from));
        }
        let op_id = Uuid::new_v4();
        self.retry
            .run("ledger.transfer_pocket", || {
                self.transfer_pocket_inner(from, to, amount, op_id)
            })
            .await
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
        let op_id = Uuid::new_v4();
        self.retry
            .run("ledger.claim_daily", || {
                self.claim_daily_inner(user_id, config, base_amount, op_id)
            })
            .await
    }
}
