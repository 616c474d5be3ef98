//! The item shop: purchases debit the pocket and apply a lasting account
//! effect (bigger bank, better luck, or a timed theft shield).

use log::info;
use std::sync::Arc;

use crate::config::ShopConfig;
use crate::interact::ReplyPayload;
use crate::ledger::{Item, ItemKind, LedgerError, LedgerResult, LedgerStore, UserId};

/// Receipt for a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub kind: ItemKind,
    pub price: i64,
    pub pocket_after: i64,
}

impl Receipt {
    pub fn render(&self) -> ReplyPayload {
        ReplyPayload::new(
            "Purchase complete",
            format!("You bought a {} for {}.", self.kind, self.price),
        )
        .with_field("Pocket", self.pocket_after.to_string())
    }
}

/// Shop service.
pub struct Shop {
    store: Arc<dyn LedgerStore>,
    config: ShopConfig,
}

impl Shop {
    pub fn new(store: Arc<dyn LedgerStore>, config: ShopConfig) -> Arc<Self> {
        Arc::new(Self { store, config })
    }

    pub fn price(&self, kind: ItemKind) -> i64 {
        match kind {
            ItemKind::BankNote => self.config.bank_note_price,
            ItemKind::LuckBoost => self.config.luck_boost_price,
            ItemKind::TheftShield => self.config.theft_shield_price,
        }
    }

    /// Buy one item: debit the price, apply its effect, record it in the
    /// inventory.
    pub async fn purchase(&self, user: UserId, kind: ItemKind) -> LedgerResult<Receipt> {
        let price = self.price(kind);
        let account = self.store.get_balance(user).await?;
        if account.pocket < price {
            return Err(LedgerError::InsufficientBalance {
                available: account.pocket,
                required: price,
            });
        }

        let pocket_after = self.store.adjust_pocket(user, -price).await?;

        let item = match kind {
            ItemKind::BankNote => {
                let new_limit = account
                    .bank_limit
                    .saturating_add(self.config.bank_note_limit_increase);
                self.store.set_bank_limit(user, new_limit).await?;
                Item::permanent(kind)
            }
            ItemKind::LuckBoost => {
                self.store
                    .set_luck(user, account.luck * self.config.luck_boost_multiplier)
                    .await?;
                Item::permanent(kind)
            }
            ItemKind::TheftShield => Item::expiring(kind, self.config.shield_duration),
        };
        self.store.push_item(user, item).await?;

        info!("User {user} bought {kind} for {price}");
        Ok(Receipt {
            kind,
            price,
            pocket_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MemoryLedgerStore, DEFAULT_BANK_LIMIT};

    async fn shop_with_funds(pocket: i64) -> (Arc<MemoryLedgerStore>, Arc<Shop>) {
        let store = Arc::new(MemoryLedgerStore::new());
        store.adjust_pocket(1, pocket).await.unwrap();
        let shop = Shop::new(store.clone(), ShopConfig::default());
        (store, shop)
    }

    #[tokio::test]
    async fn bank_note_raises_the_limit() {
        let (store, shop) = shop_with_funds(50_000).await;
        let receipt = shop.purchase(1, ItemKind::BankNote).await.unwrap();
        assert_eq!(receipt.pocket_after, 40_000);

        let account = store.get_balance(1).await.unwrap();
        assert_eq!(account.bank_limit, DEFAULT_BANK_LIMIT + 5_000);
        assert_eq!(account.inventory.len(), 1);
    }

    #[tokio::test]
    async fn luck_boosts_compound() {
        let (store, shop) = shop_with_funds(100_000).await;
        shop.purchase(1, ItemKind::LuckBoost).await.unwrap();
        shop.purchase(1, ItemKind::LuckBoost).await.unwrap();

        let account = store.get_balance(1).await.unwrap();
        assert!((account.luck - 1.44).abs() < 1e-9);
    }

    #[tokio::test]
    async fn shield_is_timed() {
        let (store, shop) = shop_with_funds(200_000).await;
        shop.purchase(1, ItemKind::TheftShield).await.unwrap();

        let account = store.get_balance(1).await.unwrap();
        assert!(account.has_active_shield(chrono::Utc::now()));
        assert!(!account.has_active_shield(
            chrono::Utc::now() + chrono::Duration::hours(25)
        ));
    }

    #[tokio::test]
    async fn broke_buyer_is_rejected_without_charge() {
        let (store, shop) = shop_with_funds(5_000).await;
        let err = shop.purchase(1, ItemKind::BankNote).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));

        let account = store.get_balance(1).await.unwrap();
        assert_eq!(account.pocket, 5_000);
        assert!(account.inventory.is_empty());
    }
}
