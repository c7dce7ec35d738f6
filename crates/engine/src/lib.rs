//! Wallet ledger engine.
//!
//! Users own wallets, wallets accumulate income/expense transactions and each
//! wallet keeps a denormalized balance. The engine keeps that balance equal to
//! the sum of the [`wallet_impact`] of the wallet's active transactions:
//!
//! - every create/update/delete/restore of a transaction adjusts the wallet
//!   inside the same database transaction;
//! - [`Engine::sync_all_wallet_balances`] recomputes balances from the
//!   transaction log and corrects drift.

pub use commands::{NewTransactionCmd, NewWalletCmd, UpdateTransactionCmd, WalletPatch};
pub use currency::Currency;
pub use error::EngineError;
pub use lifecycle::Lifecycle;
pub use money::Money;
pub use ops::{
    BalanceCorrection, DEFAULT_SYNC_BATCH_SIZE, Engine, EngineBuilder, SyncReport,
    TransactionListQuery, TransactionPage, WalletSyncError,
};
pub use store::{TransactionFilter, TransactionStore, UserStore, WalletFilter, WalletStore};
pub use transactions::{Transaction, TransactionDetail, TransactionKind, wallet_impact};
pub use users::{User, UserSummary};
pub use util::MAX_AMOUNT;
pub use wallets::{Wallet, WalletKind, WalletSummary};

mod commands;
mod currency;
mod error;
mod lifecycle;
mod money;
mod ops;
mod store;
mod transactions;
mod users;
mod util;
mod wallets;

pub type ResultEngine<T> = Result<T, EngineError>;
