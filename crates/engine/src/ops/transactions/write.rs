use sea_orm::ConnectionTrait;

use crate::{
    ResultEngine, Transaction, TransactionStore, WalletStore, util::normalize_optional_text,
};

use super::super::Engine;

mod create;
mod delete;
mod update;

/// `None` keeps `existing`; a blank patch clears it.
fn apply_optional_text_patch(existing: Option<String>, patch: Option<&str>) -> Option<String> {
    match patch {
        None => existing,
        Some(value) => normalize_optional_text(Some(value)),
    }
}

impl Engine {
    /// Inserts an active transaction and applies its impact to the wallet.
    ///
    /// Must run inside the caller's unit of work; ownership checks are the
    /// caller's job.
    pub(in crate::ops) async fn book_transaction<C: ConnectionTrait>(
        &self,
        db: &C,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        db.create_transaction(tx).await?;
        db.adjust_wallet_balance(tx.wallet_id, tx.impact()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_patch_keeps_replaces_or_clears() {
        let existing = Some("lunch".to_string());
        assert_eq!(apply_optional_text_patch(existing.clone(), None), existing);
        assert_eq!(
            apply_optional_text_patch(existing.clone(), Some(" dinner ")),
            Some("dinner".to_string())
        );
        assert_eq!(apply_optional_text_patch(existing, Some("  ")), None);
    }
}
