use chrono::Utc;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, TransactionDetail, TransactionStore, WalletStore,
};

use super::super::super::{Engine, with_tx};

impl Engine {
    /// Soft-deletes a transaction and reverses its impact on the wallet.
    pub async fn delete_transaction(&self, transaction_id: Uuid) -> ResultEngine<()> {
        let deleted_at = Utc::now();
        let tx = with_tx!(self, |db_tx| {
            let tx = self.require_transaction(&db_tx, transaction_id).await?;
            if !tx.is_active() {
                return Err(EngineError::Validation(
                    "transaction already deleted".to_string(),
                ));
            }
            db_tx.adjust_wallet_balance(tx.wallet_id, -tx.impact()).await?;
            db_tx.soft_delete_transaction(tx.id, deleted_at).await?;
            Ok(tx)
        })?;
        tracing::debug!(transaction_id = %tx.id, wallet_id = %tx.wallet_id, "deleted transaction");
        Ok(())
    }

    /// Brings a soft-deleted transaction back and re-applies its impact.
    pub async fn restore_transaction(
        &self,
        transaction_id: Uuid,
    ) -> ResultEngine<TransactionDetail> {
        let tx = with_tx!(self, |db_tx| {
            let tx = self.require_transaction(&db_tx, transaction_id).await?;
            if tx.is_active() {
                return Err(EngineError::Validation(
                    "transaction is not deleted".to_string(),
                ));
            }
            db_tx.restore_transaction(tx.id).await?;
            db_tx.adjust_wallet_balance(tx.wallet_id, tx.impact()).await?;
            Ok(tx)
        })?;
        tracing::debug!(transaction_id = %tx.id, wallet_id = %tx.wallet_id, "restored transaction");

        self.transaction_detail(&self.database, transaction_id).await
    }
}
