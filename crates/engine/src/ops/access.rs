use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionStore, UserStore, Wallet, WalletStore,
};

use super::Engine;

fn forbidden_wallet() -> EngineError {
    EngineError::Forbidden("wallet does not belong to user".to_string())
}

impl Engine {
    pub(super) async fn require_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        if !db.user_exists(user_id).await? {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }

    /// Active wallet owned by `user_id`.
    ///
    /// Missing or soft-deleted → `KeyNotFound`; owned by someone else →
    /// `Forbidden`.
    pub(super) async fn require_owned_wallet<C: ConnectionTrait>(
        &self,
        db: &C,
        wallet_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<Wallet> {
        let wallet = db
            .wallet_by_id(wallet_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
        if wallet.user_id != user_id {
            return Err(forbidden_wallet());
        }
        Ok(wallet)
    }

    /// Wallet in any lifecycle owned by `user_id`.
    pub(super) async fn require_owned_wallet_any<C: ConnectionTrait>(
        &self,
        db: &C,
        wallet_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<Wallet> {
        let wallet = db
            .wallet_by_id_any(wallet_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
        if wallet.user_id != user_id {
            return Err(forbidden_wallet());
        }
        Ok(wallet)
    }

    pub(super) async fn require_transaction<C: ConnectionTrait>(
        &self,
        db: &C,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        db.transaction_by_id(transaction_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }
}
