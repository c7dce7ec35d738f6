use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, TransactionDetail, UserStore, UserSummary, WalletStore,
    WalletSummary,
};

use super::Engine;

mod list;
mod write;

pub use list::{TransactionListQuery, TransactionPage};

impl Engine {
    /// Loads a transaction with its owner and wallet resolved.
    ///
    /// Soft-deleted transactions are returned too; `caller` must own it.
    pub async fn transaction(
        &self,
        transaction_id: Uuid,
        caller: Uuid,
    ) -> ResultEngine<TransactionDetail> {
        let detail = self
            .transaction_detail(&self.database, transaction_id)
            .await?;
        if detail.transaction.user_id != caller {
            return Err(EngineError::Forbidden(
                "transaction does not belong to user".to_string(),
            ));
        }
        Ok(detail)
    }

    /// Transaction plus user and wallet summaries.
    ///
    /// A wallet that was soft-deleted still resolves.
    pub(super) async fn transaction_detail<C: ConnectionTrait>(
        &self,
        db: &C,
        transaction_id: Uuid,
    ) -> ResultEngine<TransactionDetail> {
        let transaction = self.require_transaction(db, transaction_id).await?;
        let user = db
            .user_by_id(transaction.user_id)
            .await?
            .as_ref()
            .map(UserSummary::from);
        let wallet = db
            .wallet_by_id_any(transaction.wallet_id)
            .await?
            .as_ref()
            .map(WalletSummary::from);

        Ok(TransactionDetail {
            transaction,
            user,
            wallet,
        })
    }
}
