//! Balance reconciliation.
//!
//! Recomputes each wallet's balance from its transaction log and overwrites
//! the stored value when they drift apart. Soft-deleted wallets are
//! reconciled too: their transactions still count.

use serde::Serialize;
use uuid::Uuid;

use sea_orm::TransactionTrait;

use crate::{
    EngineError, Money, ResultEngine, Transaction, TransactionStore, WalletFilter, WalletStore,
    util::balance_out_of_range,
};

use super::{Engine, with_tx};

/// A stored balance that did not match the transaction log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BalanceCorrection {
    pub wallet_id: Uuid,
    pub before: Money,
    pub after: Money,
    /// `after - before`.
    pub delta: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WalletSyncError {
    pub wallet_id: Uuid,
    pub error: String,
}

/// Outcome of a reconciliation run. One failing wallet never aborts the
/// others.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Wallets examined.
    pub total: u64,
    pub corrected: u64,
    pub failed: u64,
    pub corrections: Vec<BalanceCorrection>,
    pub errors: Vec<WalletSyncError>,
}

impl SyncReport {
    fn record(&mut self, wallet_id: Uuid, outcome: ResultEngine<Option<BalanceCorrection>>) {
        self.total += 1;
        match outcome {
            Ok(Some(correction)) => {
                self.corrected += 1;
                self.corrections.push(correction);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(wallet_id = %wallet_id, "wallet balance sync failed: {err}");
                self.failed += 1;
                self.errors.push(WalletSyncError {
                    wallet_id,
                    error: err.to_string(),
                });
            }
        }
    }

    #[must_use]
    pub fn failed_wallet_ids(&self) -> Vec<Uuid> {
        self.errors.iter().map(|e| e.wallet_id).collect()
    }
}

/// Sum of the impacts of the active transactions in `transactions`.
pub(crate) fn computed_balance(transactions: &[Transaction]) -> ResultEngine<Money> {
    transactions
        .iter()
        .filter(|tx| tx.is_active())
        .try_fold(Money::ZERO, |total, tx| {
            total
                .checked_add(tx.impact())
                .ok_or_else(balance_out_of_range)
        })
}

impl Engine {
    /// Reconciles one wallet.
    ///
    /// Returns the correction applied, or `None` when the stored balance
    /// already matched. The overwrite is compare-and-set: if a concurrent
    /// write moved the balance after it was read, nothing is written and
    /// `Conflict` is returned.
    pub async fn sync_wallet_balance(
        &self,
        wallet_id: Uuid,
    ) -> ResultEngine<Option<BalanceCorrection>> {
        let correction = with_tx!(self, |db_tx| {
            let wallet = db_tx
                .wallet_by_id_any(wallet_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
            let transactions = db_tx.list_by_wallet(wallet_id).await?;
            let computed = computed_balance(&transactions)?;
            if computed == wallet.balance {
                return Ok(None);
            }

            if !db_tx
                .set_wallet_balance_if(wallet_id, wallet.balance, computed)
                .await?
            {
                return Err(EngineError::Conflict(
                    "wallet balance changed during sync".to_string(),
                ));
            }
            Ok(Some(BalanceCorrection {
                wallet_id,
                before: wallet.balance,
                after: computed,
                delta: computed
                    .checked_sub(wallet.balance)
                    .ok_or_else(balance_out_of_range)?,
            }))
        })?;

        if let Some(c) = &correction {
            tracing::warn!(
                wallet_id = %c.wallet_id,
                before = %c.before,
                after = %c.after,
                delta = %c.delta,
                "corrected wallet balance drift"
            );
        }
        Ok(correction)
    }

    /// Reconciles every wallet, paging through them `sync_batch_size` at a
    /// time.
    ///
    /// Per-wallet failures are collected in the report; only a failure to
    /// load a page of wallets fails the whole run.
    pub async fn sync_all_wallet_balances(&self) -> ResultEngine<SyncReport> {
        let filter = WalletFilter {
            user_id: None,
            include_deleted: true,
        };
        let mut report = SyncReport::default();
        let mut after = None;

        loop {
            let page = self
                .database
                .list_wallets(&filter, after, self.sync_batch_size)
                .await?;
            let full = page.len() as u64 == self.sync_batch_size;
            after = page.last().map(|w| w.id);
            for wallet in &page {
                let outcome = self.sync_wallet_balance(wallet.id).await;
                report.record(wallet.id, outcome);
            }
            if !full {
                break;
            }
        }

        tracing::info!(
            total = report.total,
            corrected = report.corrected,
            failed = report.failed,
            "wallet balance sync finished"
        );
        Ok(report)
    }

    /// Reconciles only the given wallets, e.g. to retry the failures of a
    /// previous run.
    pub async fn sync_wallets(&self, wallet_ids: &[Uuid]) -> SyncReport {
        let mut report = SyncReport::default();
        for &wallet_id in wallet_ids {
            let outcome = self.sync_wallet_balance(wallet_id).await;
            report.record(wallet_id, outcome);
        }
        report
    }
}
