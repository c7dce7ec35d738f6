use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ConnectionTrait, TransactionTrait};

use crate::{
    EngineError, NewWalletCmd, ResultEngine, Transaction, TransactionKind, Wallet, WalletFilter,
    WalletPatch, WalletStore,
    util::{normalize_optional_text, normalize_required_name, validate_opening_balance},
};

use super::{Engine, with_tx};

const OPENING_TRANSACTION_NAME: &str = "Opening balance";
const OPENING_CATEGORY: &str = "opening";

fn wallet_name_taken(name: &str) -> EngineError {
    EngineError::ExistingKey(format!("wallet {name} already exists"))
}

impl Engine {
    async fn ensure_wallet_name_free<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        match db.wallet_by_name(user_id, name).await? {
            Some(existing) if Some(existing.id) != except => Err(wallet_name_taken(name)),
            _ => Ok(()),
        }
    }

    /// Add a new wallet for a user.
    ///
    /// `opening_balance` is modeled as an opening transaction:
    /// - if `opening_balance > 0`: an opening `Income`
    /// - if `opening_balance < 0`: an opening `Expense`
    ///
    /// so the balance always matches the transaction log.
    pub async fn new_wallet(&self, cmd: NewWalletCmd) -> ResultEngine<Wallet> {
        let name = normalize_required_name(&cmd.name, "wallet")?;
        let category = normalize_optional_text(cmd.category.as_deref());
        let opening_balance = validate_opening_balance(cmd.opening_balance)?;
        let wallet = Wallet::new(cmd.user_id, name, cmd.kind, category, cmd.currency);

        let wallet = with_tx!(self, |db_tx| {
            self.require_user(&db_tx, wallet.user_id).await?;
            self.ensure_wallet_name_free(&db_tx, wallet.user_id, &wallet.name, None)
                .await?;
            db_tx.create_wallet(&wallet).await?;

            if !opening_balance.is_zero() {
                let kind = if opening_balance.is_negative() {
                    TransactionKind::Expense
                } else {
                    TransactionKind::Income
                };
                let opening = Transaction::new(
                    wallet.user_id,
                    wallet.id,
                    OPENING_TRANSACTION_NAME,
                    opening_balance.abs(),
                    kind,
                    None,
                    Some(OPENING_CATEGORY),
                )?;
                self.book_transaction(&db_tx, &opening).await?;
            }

            db_tx
                .wallet_by_id(wallet.id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
        })?;
        tracing::debug!(wallet_id = %wallet.id, balance = %wallet.balance, "created wallet");
        Ok(wallet)
    }

    /// Return a wallet snapshot from DB, soft-deleted or not.
    pub async fn wallet(&self, wallet_id: Uuid, user_id: Uuid) -> ResultEngine<Wallet> {
        self.require_owned_wallet_any(&self.database, wallet_id, user_id)
            .await
    }

    /// Every wallet of a user, ordered by id.
    pub async fn list_wallets(
        &self,
        user_id: Uuid,
        include_deleted: bool,
    ) -> ResultEngine<Vec<Wallet>> {
        self.require_user(&self.database, user_id).await?;
        let filter = WalletFilter {
            user_id: Some(user_id),
            include_deleted,
        };

        let mut out = Vec::new();
        let mut after = None;
        loop {
            let page = self
                .database
                .list_wallets(&filter, after, self.sync_batch_size)
                .await?;
            let full = page.len() as u64 == self.sync_batch_size;
            after = page.last().map(|w| w.id);
            out.extend(page);
            if !full {
                break;
            }
        }
        Ok(out)
    }

    /// Renames or re-labels an active wallet. Balance and currency are not
    /// editable.
    pub async fn update_wallet(
        &self,
        wallet_id: Uuid,
        user_id: Uuid,
        patch: WalletPatch,
    ) -> ResultEngine<Wallet> {
        if patch.is_empty() {
            return Err(EngineError::Validation("nothing to update".to_string()));
        }
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "wallet"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let mut wallet = self
                .require_owned_wallet(&db_tx, wallet_id, user_id)
                .await?;
            if let Some(name) = name {
                self.ensure_wallet_name_free(&db_tx, user_id, &name, Some(wallet.id))
                    .await?;
                wallet.name = name;
            }
            if let Some(kind) = patch.kind {
                wallet.kind = kind;
            }
            if let Some(category) = patch.category.as_deref() {
                wallet.category = normalize_optional_text(Some(category));
            }
            wallet.updated_at = Utc::now();
            db_tx.update_wallet(&wallet).await?;
            Ok(wallet)
        })
    }

    /// Soft-deletes a wallet. Its transactions stay untouched and keep
    /// counting towards its balance.
    pub async fn delete_wallet(&self, wallet_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        let deleted_at = Utc::now();
        with_tx!(self, |db_tx| {
            self.require_owned_wallet(&db_tx, wallet_id, user_id)
                .await?;
            db_tx.soft_delete_wallet(wallet_id, deleted_at).await
        })?;
        tracing::debug!(wallet_id = %wallet_id, "deleted wallet");
        Ok(())
    }

    pub async fn restore_wallet(&self, wallet_id: Uuid, user_id: Uuid) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let wallet = self
                .require_owned_wallet_any(&db_tx, wallet_id, user_id)
                .await?;
            if wallet.is_active() {
                return Err(EngineError::Validation("wallet is not deleted".to_string()));
            }
            self.ensure_wallet_name_free(&db_tx, user_id, &wallet.name, None)
                .await?;
            db_tx.restore_wallet(wallet_id).await?;
            db_tx
                .wallet_by_id(wallet_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
        })
    }
}
