//! Mapping between engine types and wire types.

use api_types::{
    sync::{BalanceCorrectionView, SyncReportView, WalletSyncErrorView},
    transaction::{TransactionKind as ApiKind, TransactionView},
    user::UserView,
    wallet::{WalletKind as ApiWalletKind, WalletSummaryView, WalletView},
};
use engine::{
    BalanceCorrection, Currency, SyncReport, Transaction, TransactionDetail, TransactionKind,
    Wallet, WalletKind,
};

pub(crate) fn map_currency(currency: Currency) -> api_types::Currency {
    match currency {
        Currency::Eur => api_types::Currency::Eur,
        Currency::Usd => api_types::Currency::Usd,
        Currency::Idr => api_types::Currency::Idr,
    }
}

pub(crate) fn currency_from_api(currency: api_types::Currency) -> Currency {
    match currency {
        api_types::Currency::Eur => Currency::Eur,
        api_types::Currency::Usd => Currency::Usd,
        api_types::Currency::Idr => Currency::Idr,
    }
}

pub(crate) fn map_kind(kind: TransactionKind) -> ApiKind {
    match kind {
        TransactionKind::Income => ApiKind::Income,
        TransactionKind::Expense => ApiKind::Expense,
    }
}

pub(crate) fn kind_from_api(kind: ApiKind) -> TransactionKind {
    match kind {
        ApiKind::Income => TransactionKind::Income,
        ApiKind::Expense => TransactionKind::Expense,
    }
}

pub(crate) fn map_wallet_kind(kind: WalletKind) -> ApiWalletKind {
    match kind {
        WalletKind::Cash => ApiWalletKind::Cash,
        WalletKind::Bank => ApiWalletKind::Bank,
        WalletKind::EWallet => ApiWalletKind::EWallet,
        WalletKind::CreditCard => ApiWalletKind::CreditCard,
        WalletKind::Other => ApiWalletKind::Other,
    }
}

pub(crate) fn wallet_kind_from_api(kind: ApiWalletKind) -> WalletKind {
    match kind {
        ApiWalletKind::Cash => WalletKind::Cash,
        ApiWalletKind::Bank => WalletKind::Bank,
        ApiWalletKind::EWallet => WalletKind::EWallet,
        ApiWalletKind::CreditCard => WalletKind::CreditCard,
        ApiWalletKind::Other => WalletKind::Other,
    }
}

pub(crate) fn transaction_view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        name: tx.name,
        cost: tx.cost.to_string(),
        kind: map_kind(tx.kind),
        note: tx.note,
        category: tx.category,
        user_id: tx.user_id,
        wallet_id: tx.wallet_id,
        deleted: !tx.lifecycle.is_active(),
        deleted_at: tx.lifecycle.deleted_at(),
        created_at: tx.created_at,
        updated_at: tx.updated_at,
        user: None,
        wallet: None,
    }
}

pub(crate) fn transaction_detail_view(detail: TransactionDetail) -> TransactionView {
    TransactionView {
        user: detail.user.map(|user| UserView {
            id: user.id,
            username: user.username,
        }),
        wallet: detail.wallet.map(|wallet| WalletSummaryView {
            id: wallet.id,
            name: wallet.name,
            kind: map_wallet_kind(wallet.kind),
            currency: map_currency(wallet.currency),
        }),
        ..transaction_view(detail.transaction)
    }
}

pub(crate) fn wallet_view(wallet: Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name,
        kind: map_wallet_kind(wallet.kind),
        category: wallet.category,
        currency: map_currency(wallet.currency),
        balance: wallet.balance.to_string(),
        user_id: wallet.user_id,
        deleted: !wallet.lifecycle.is_active(),
        deleted_at: wallet.lifecycle.deleted_at(),
        created_at: wallet.created_at,
        updated_at: wallet.updated_at,
    }
}

pub(crate) fn correction_view(correction: BalanceCorrection) -> BalanceCorrectionView {
    BalanceCorrectionView {
        wallet_id: correction.wallet_id,
        before: correction.before.to_string(),
        after: correction.after.to_string(),
        delta: correction.delta.to_string(),
    }
}

pub(crate) fn report_view(report: SyncReport) -> SyncReportView {
    SyncReportView {
        total: report.total,
        corrected: report.corrected,
        failed: report.failed,
        corrections: report.corrections.into_iter().map(correction_view).collect(),
        errors: report
            .errors
            .into_iter()
            .map(|e| WalletSyncErrorView {
                wallet_id: e.wallet_id,
                error: e.error,
            })
            .collect(),
    }
}
