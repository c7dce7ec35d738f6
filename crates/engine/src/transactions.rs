//! Transaction primitives.
//!
//! A `Transaction` moves money in or out of exactly one wallet. The signed
//! amount it contributes to that wallet is its *wallet impact*, computed by
//! [`wallet_impact`] and nowhere else.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Lifecycle, Money, ResultEngine, UserSummary, WalletSummary,
    util::{normalize_optional_text, normalize_required_name, parse_uuid, validate_cost},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Signed amount a transaction of `kind` and `cost` applies to its wallet.
///
/// `cost` is always read as a magnitude; the sign comes from `kind` only.
#[must_use]
pub fn wallet_impact(kind: TransactionKind, cost: Money) -> Money {
    match kind {
        TransactionKind::Income => cost.abs(),
        TransactionKind::Expense => -cost.abs(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub name: String,
    pub cost: Money,
    pub kind: TransactionKind,
    pub note: Option<String>,
    pub category: Option<String>,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        wallet_id: Uuid,
        name: &str,
        cost: Money,
        kind: TransactionKind,
        note: Option<&str>,
        category: Option<&str>,
    ) -> ResultEngine<Self> {
        let name = normalize_required_name(name, "transaction")?;
        let cost = validate_cost(cost)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            cost,
            kind,
            note: normalize_optional_text(note),
            category: normalize_optional_text(category),
            user_id,
            wallet_id,
            lifecycle: Lifecycle::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Signed contribution to the owning wallet's balance.
    #[must_use]
    pub fn impact(&self) -> Money {
        wallet_impact(self.kind, self.cost)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }
}

/// A transaction with its owner and wallet resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub transaction: Transaction,
    pub user: Option<UserSummary>,
    pub wallet: Option<WalletSummary>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub cost: i64,
    pub kind: String,
    pub note: Option<String>,
    pub category: Option<String>,
    pub user_id: String,
    pub wallet_id: String,
    pub deleted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            name: ActiveValue::Set(tx.name.clone()),
            cost: ActiveValue::Set(tx.cost.minor()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            note: ActiveValue::Set(tx.note.clone()),
            category: ActiveValue::Set(tx.category.clone()),
            user_id: ActiveValue::Set(tx.user_id.to_string()),
            wallet_id: ActiveValue::Set(tx.wallet_id.to_string()),
            deleted_at: ActiveValue::Set(tx.lifecycle.deleted_at()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            name: model.name,
            cost: Money::new(model.cost),
            kind: TransactionKind::try_from(model.kind.as_str())?,
            note: model.note,
            category: model.category,
            user_id: parse_uuid(&model.user_id, "user")?,
            wallet_id: parse_uuid(&model.wallet_id, "wallet")?,
            lifecycle: Lifecycle::from(model.deleted_at),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_is_positive_expense_is_negative() {
        assert_eq!(
            wallet_impact(TransactionKind::Income, Money::new(20_000)),
            Money::new(20_000)
        );
        assert_eq!(
            wallet_impact(TransactionKind::Expense, Money::new(20_000)),
            Money::new(-20_000)
        );
    }

    #[test]
    fn cost_sign_is_ignored() {
        assert_eq!(
            wallet_impact(TransactionKind::Income, Money::new(-500)),
            Money::new(500)
        );
        assert_eq!(
            wallet_impact(TransactionKind::Expense, Money::new(-500)),
            Money::new(-500)
        );
        assert_eq!(
            wallet_impact(TransactionKind::Expense, Money::ZERO),
            Money::ZERO
        );
    }

    #[test]
    fn new_transaction_validates_input() {
        let user_id = Uuid::new_v4();
        let wallet_id = Uuid::new_v4();

        let tx = Transaction::new(
            user_id,
            wallet_id,
            "  Lunch ",
            Money::new(1500),
            TransactionKind::Expense,
            Some(" "),
            Some("food"),
        )
        .unwrap();
        assert_eq!(tx.name, "Lunch");
        assert_eq!(tx.note, None);
        assert_eq!(tx.category.as_deref(), Some("food"));
        assert_eq!(tx.impact(), Money::new(-1500));
        assert!(tx.is_active());

        assert!(
            Transaction::new(
                user_id,
                wallet_id,
                "",
                Money::new(1),
                TransactionKind::Income,
                None,
                None,
            )
            .is_err()
        );
        assert!(
            Transaction::new(
                user_id,
                wallet_id,
                "Refund",
                Money::new(-1),
                TransactionKind::Income,
                None,
                None,
            )
            .is_err()
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(TransactionKind::try_from("transfer").is_err());
        assert_eq!(
            TransactionKind::try_from("income").unwrap(),
            TransactionKind::Income
        );
    }
}
