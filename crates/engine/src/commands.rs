//! Command structs for engine operations.
//!
//! These types group parameters for write operations
//! (create/update of transactions and wallets), keeping call sites readable
//! and avoiding long argument lists.

use uuid::Uuid;

use crate::{Currency, Money, TransactionKind, WalletKind};

/// Create an income or expense transaction.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub name: String,
    pub cost: Money,
    pub kind: TransactionKind,
    pub note: Option<String>,
    pub category: Option<String>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        wallet_id: Uuid,
        name: impl Into<String>,
        cost: Money,
        kind: TransactionKind,
    ) -> Self {
        Self {
            user_id,
            wallet_id,
            name: name.into(),
            cost,
            kind,
            note: None,
            category: None,
        }
    }

    #[must_use]
    pub fn income(
        user_id: Uuid,
        wallet_id: Uuid,
        name: impl Into<String>,
        cost: Money,
    ) -> Self {
        Self::new(user_id, wallet_id, name, cost, TransactionKind::Income)
    }

    #[must_use]
    pub fn expense(
        user_id: Uuid,
        wallet_id: Uuid,
        name: impl Into<String>,
        cost: Money,
    ) -> Self {
        Self::new(user_id, wallet_id, name, cost, TransactionKind::Expense)
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Partial update of a transaction.
///
/// `None` keeps the stored value. For `note`/`category` a blank string clears
/// the stored value.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub transaction_id: Uuid,

    pub name: Option<String>,
    pub cost: Option<Money>,
    pub kind: Option<TransactionKind>,
    pub note: Option<String>,
    pub category: Option<String>,

    // Reassignment.
    pub wallet_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(transaction_id: Uuid) -> Self {
        Self {
            transaction_id,
            name: None,
            cost: None,
            kind: None,
            note: None,
            category: None,
            wallet_id: None,
            user_id: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn cost(mut self, cost: Money) -> Self {
        self.cost = Some(cost);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn wallet_id(mut self, wallet_id: Uuid) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Create a wallet.
///
/// A non-zero `opening_balance` is booked as an opening transaction.
#[derive(Clone, Debug)]
pub struct NewWalletCmd {
    pub user_id: Uuid,
    pub name: String,
    pub kind: WalletKind,
    pub category: Option<String>,
    pub currency: Currency,
    pub opening_balance: Money,
}

impl NewWalletCmd {
    #[must_use]
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            kind: WalletKind::default(),
            category: None,
            currency: Currency::default(),
            opening_balance: Money::ZERO,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: WalletKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn opening_balance(mut self, opening_balance: Money) -> Self {
        self.opening_balance = opening_balance;
        self
    }
}

/// Partial update of a wallet's descriptive fields.
#[derive(Clone, Debug, Default)]
pub struct WalletPatch {
    pub name: Option<String>,
    pub kind: Option<WalletKind>,
    pub category: Option<String>,
}

impl WalletPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none() && self.category.is_none()
    }
}
