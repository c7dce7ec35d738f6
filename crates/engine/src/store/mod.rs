//! Persistence contracts used by the engine.
//!
//! Every store is implemented for any sea-orm [`ConnectionTrait`], so the
//! same calls run against the connection pool or inside an open
//! `DatabaseTransaction` (the unit of work). Stores never open or commit
//! transactions themselves.
//!
//! Wallet balances are only ever changed through
//! [`WalletStore::adjust_wallet_balance`] (server-side increment) or
//! [`WalletStore::set_wallet_balance_if`] (compare-and-set). No store method
//! writes a balance that was read earlier by the caller.
//!
//! [`ConnectionTrait`]: sea_orm::ConnectionTrait

mod transactions;
mod users;
mod wallets;

pub use transactions::{TransactionFilter, TransactionStore};
pub use users::UserStore;
pub use wallets::{WalletFilter, WalletStore};
