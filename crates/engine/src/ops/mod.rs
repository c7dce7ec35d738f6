use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod access;
mod balances;
mod transactions;
mod users;
mod wallets;

pub use balances::{BalanceCorrection, SyncReport, WalletSyncError};
pub use transactions::{TransactionListQuery, TransactionPage};

/// Wallets loaded per page by the reconciliation job.
pub const DEFAULT_SYNC_BATCH_SIZE: u64 = 100;

/// Run a block inside a DB transaction (the unit of work), committing on
/// success and rolling back on error.
///
/// `?` inside the block leaves the block, not the caller, so the rollback
/// always runs. If the caller's future is dropped mid-block the
/// `DatabaseTransaction` is dropped too, which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: $crate::ResultEngine<_> = async { $body }.await;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = $tx.rollback().await {
                    tracing::error!("failed to roll back unit of work: {rollback_err}");
                }
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    sync_batch_size: u64,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    sync_batch_size: u64,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            sync_batch_size: DEFAULT_SYNC_BATCH_SIZE,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// How many wallets the reconciliation job loads per page.
    pub fn sync_batch_size(mut self, size: u64) -> EngineBuilder {
        self.sync_batch_size = size.max(1);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            sync_batch_size: self.sync_batch_size,
        })
    }
}
