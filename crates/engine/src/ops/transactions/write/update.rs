use chrono::Utc;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine, Transaction, TransactionDetail, TransactionStore,
    UpdateTransactionCmd, WalletStore,
    util::{balance_out_of_range, normalize_required_name, validate_cost},
};

use super::apply_optional_text_patch;
use super::super::super::{Engine, with_tx};

/// How an update moves money between wallet balances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BalanceChange {
    /// Old impact leaves `from`, new impact lands on `to`.
    WalletMoved {
        from: Uuid,
        reverse: Money,
        to: Uuid,
        apply: Money,
    },
    /// Same wallet, different impact.
    Delta { wallet_id: Uuid, delta: Money },
    Unchanged,
}

impl BalanceChange {
    /// A wallet move wins over a cost/kind change; a change whose impact
    /// nets to zero is no change at all.
    fn between(current: &Transaction, next: &Transaction) -> ResultEngine<Self> {
        if current.wallet_id != next.wallet_id {
            return Ok(Self::WalletMoved {
                from: current.wallet_id,
                reverse: -current.impact(),
                to: next.wallet_id,
                apply: next.impact(),
            });
        }
        let delta = next
            .impact()
            .checked_sub(current.impact())
            .ok_or_else(balance_out_of_range)?;
        if delta.is_zero() {
            Ok(Self::Unchanged)
        } else {
            Ok(Self::Delta {
                wallet_id: next.wallet_id,
                delta,
            })
        }
    }
}

impl Engine {
    /// Applies a partial update to an active transaction.
    ///
    /// The row and every affected wallet balance change in one unit of work.
    /// Moving the transaction to another wallet requires the (possibly new)
    /// owner to own the target wallet, which must be active and in the same
    /// currency.
    pub async fn update_transaction(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<TransactionDetail> {
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "transaction"))
            .transpose()?;
        let cost = cmd.cost.map(validate_cost).transpose()?;
        let transaction_id = cmd.transaction_id;

        let change = with_tx!(self, |db_tx| {
            let current = self.require_transaction(&db_tx, transaction_id).await?;
            if !current.is_active() {
                return Err(EngineError::Validation(
                    "cannot update a deleted transaction".to_string(),
                ));
            }

            let mut next = current.clone();
            if let Some(name) = name {
                next.name = name;
            }
            if let Some(cost) = cost {
                next.cost = cost;
            }
            if let Some(kind) = cmd.kind {
                next.kind = kind;
            }
            next.note = apply_optional_text_patch(current.note.clone(), cmd.note.as_deref());
            next.category =
                apply_optional_text_patch(current.category.clone(), cmd.category.as_deref());

            if let Some(user_id) = cmd.user_id.filter(|id| *id != current.user_id) {
                self.require_user(&db_tx, user_id).await?;
                next.user_id = user_id;
            }
            if let Some(wallet_id) = cmd.wallet_id.filter(|id| *id != current.wallet_id) {
                let target = self
                    .require_owned_wallet(&db_tx, wallet_id, next.user_id)
                    .await?;
                let source = db_tx.wallet_by_id_any(current.wallet_id).await?;
                if source.is_some_and(|source| source.currency != target.currency) {
                    return Err(EngineError::Validation(
                        "cannot move transaction between wallets of different currencies"
                            .to_string(),
                    ));
                }
                next.wallet_id = wallet_id;
            }

            let change = BalanceChange::between(&current, &next)?;
            match change {
                BalanceChange::WalletMoved {
                    from,
                    reverse,
                    to,
                    apply,
                } => {
                    db_tx.adjust_wallet_balance(from, reverse).await?;
                    db_tx.adjust_wallet_balance(to, apply).await?;
                }
                BalanceChange::Delta { wallet_id, delta } => {
                    db_tx.adjust_wallet_balance(wallet_id, delta).await?;
                }
                BalanceChange::Unchanged => {}
            }

            next.updated_at = Utc::now();
            db_tx.update_transaction(&next).await?;
            Ok(change)
        })?;
        tracing::debug!(transaction_id = %transaction_id, ?change, "updated transaction");

        self.transaction_detail(&self.database, transaction_id)
            .await
    }
}
