//! Balance ledger: accounts, atomic mutations, and the store backends.

pub mod errors;
pub mod memory;
pub mod models;
pub mod pg;
pub mod retry;
pub mod store;

pub use errors::{LedgerError, LedgerResult};
pub use memory::MemoryLedgerStore;
pub use models::{
    Account, BankAdjustment, ChannelKey, DailyClaim, Item, ItemKind, UserId, DEFAULT_BANK_LIMIT,
    DEFAULT_LUCK, MAX_CURRENCY,
};
pub use pg::PgLedgerStore;
pub use retry::RetryPolicy;
pub use store::LedgerStore;
