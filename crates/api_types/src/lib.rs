//! Request and response bodies of the HTTP API.
//!
//! Amounts are decimal strings with at most two fraction digits (`"200.00"`).
//! Timestamps are RFC3339 in UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Usd,
    #[default]
    Idr,
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub username: String,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum WalletKind {
        #[default]
        Cash,
        Bank,
        EWallet,
        CreditCard,
        Other,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        pub kind: Option<WalletKind>,
        pub category: Option<String>,
        pub currency: Option<Currency>,
        /// Booked as an opening transaction. May be negative.
        pub opening_balance: Option<String>,
    }

    /// Absent fields are left untouched; a blank `category` clears it.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WalletUpdate {
        pub name: Option<String>,
        pub kind: Option<WalletKind>,
        pub category: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WalletList {
        pub include_deleted: Option<bool>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WalletSummaryView {
        pub id: Uuid,
        pub name: String,
        pub kind: WalletKind,
        pub currency: Currency,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub name: String,
        pub kind: WalletKind,
        pub category: Option<String>,
        pub currency: Currency,
        pub balance: String,
        pub user_id: Uuid,
        pub deleted: bool,
        pub deleted_at: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletListResponse {
        pub wallets: Vec<WalletView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub wallet_id: Uuid,
        pub name: String,
        /// Magnitude; the sign comes from `kind`.
        pub cost: String,
        pub kind: TransactionKind,
        pub note: Option<String>,
        pub category: Option<String>,
    }

    /// Partial update. Absent fields are left untouched; a blank `note` or
    /// `category` clears it.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub name: Option<String>,
        pub cost: Option<String>,
        pub kind: Option<TransactionKind>,
        pub note: Option<String>,
        pub category: Option<String>,
        pub wallet_id: Option<Uuid>,
        pub user_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub wallet_id: Option<Uuid>,
        pub kind: Option<TransactionKind>,
        pub include_deleted: Option<bool>,
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub name: String,
        pub cost: String,
        pub kind: TransactionKind,
        pub note: Option<String>,
        pub category: Option<String>,
        pub user_id: Uuid,
        pub wallet_id: Uuid,
        pub deleted: bool,
        pub deleted_at: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub user: Option<super::user::UserView>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub wallet: Option<super::wallet::WalletSummaryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }
}

pub mod sync {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BalanceCorrectionView {
        pub wallet_id: Uuid,
        pub before: String,
        pub after: String,
        pub delta: String,
    }

    /// Result of reconciling one wallet. `correction` is absent when the
    /// stored balance already matched.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletSyncResponse {
        pub wallet_id: Uuid,
        pub correction: Option<BalanceCorrectionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletSyncErrorView {
        pub wallet_id: Uuid,
        pub error: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SyncReportView {
        pub total: u64,
        pub corrected: u64,
        pub failed: u64,
        pub corrections: Vec<BalanceCorrectionView>,
        pub errors: Vec<WalletSyncErrorView>,
    }
}
