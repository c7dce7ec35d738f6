use sea_orm::TransactionTrait;

use crate::{NewTransactionCmd, ResultEngine, Transaction, TransactionDetail};

use super::super::super::{Engine, with_tx};

impl Engine {
    /// Records an income or expense on one of the user's active wallets.
    ///
    /// The row insert and the wallet balance change commit together.
    pub async fn create_transaction(
        &self,
        cmd: NewTransactionCmd,
    ) -> ResultEngine<TransactionDetail> {
        let tx = Transaction::new(
            cmd.user_id,
            cmd.wallet_id,
            &cmd.name,
            cmd.cost,
            cmd.kind,
            cmd.note.as_deref(),
            cmd.category.as_deref(),
        )?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, tx.user_id).await?;
            self.require_owned_wallet(&db_tx, tx.wallet_id, tx.user_id)
                .await?;
            self.book_transaction(&db_tx, &tx).await
        })?;
        tracing::debug!(
            transaction_id = %tx.id,
            wallet_id = %tx.wallet_id,
            impact = %tx.impact(),
            "created transaction"
        );

        self.transaction_detail(&self.database, tx.id).await
    }
}
