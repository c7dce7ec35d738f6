//! The module contains `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, Lifecycle, Money, util::parse_uuid};

/// What kind of place the money sits in.
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

impl WalletKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::EWallet => "e_wallet",
            Self::CreditCard => "credit_card",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for WalletKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "bank" => Ok(Self::Bank),
            "e_wallet" => Ok(Self::EWallet),
            "credit_card" => Ok(Self::CreditCard),
            "other" => Ok(Self::Other),
            other => Err(EngineError::Validation(format!(
                "invalid wallet kind: {other}"
            ))),
        }
    }
}

/// A wallet.
///
/// A wallet is a representation of a real wallet, a bank account or anything
/// else where money are kept. Its `balance` is denormalized: it must always
/// equal the sum of the impacts of its active transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub name: String,
    pub kind: WalletKind,
    pub category: Option<String>,
    pub currency: Currency,
    pub balance: Money,
    pub user_id: Uuid,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// New active wallet with a zero balance.
    ///
    /// Opening balances are booked as transactions by the engine, never
    /// written here.
    pub fn new(
        user_id: Uuid,
        name: String,
        kind: WalletKind,
        category: Option<String>,
        currency: Currency,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            category,
            currency,
            balance: Money::ZERO,
            user_id,
            lifecycle: Lifecycle::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }
}

/// Embedded in transaction views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub id: Uuid,
    pub name: String,
    pub kind: WalletKind,
    pub currency: Currency,
}

impl From<&Wallet> for WalletSummary {
    fn from(wallet: &Wallet) -> Self {
        Self {
            id: wallet.id,
            name: wallet.name.clone(),
            kind: wallet.kind,
            currency: wallet.currency,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub kind: String,
    pub category: Option<String>,
    pub currency: String,
    pub balance: i64,
    pub user_id: String,
    pub deleted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            category: ActiveValue::Set(value.category.clone()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            balance: ActiveValue::Set(value.balance.minor()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            deleted_at: ActiveValue::Set(value.lifecycle.deleted_at()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "wallet")?,
            name: model.name,
            kind: WalletKind::try_from(model.kind.as_str())?,
            category: model.category,
            currency: Currency::try_from(model.currency.as_str())?,
            balance: Money::new(model.balance),
            user_id: parse_uuid(&model.user_id, "user")?,
            lifecycle: Lifecycle::from(model.deleted_at),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4().to_string(),
            name: "Cash".to_string(),
            kind: "e_wallet".to_string(),
            category: None,
            currency: "IDR".to_string(),
            balance: 100_000,
            user_id: Uuid::new_v4().to_string(),
            deleted_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn model_round_trips_into_domain() {
        let wallet = Wallet::try_from(model()).unwrap();

        assert_eq!(wallet.kind, WalletKind::EWallet);
        assert_eq!(wallet.currency, Currency::Idr);
        assert_eq!(wallet.balance, Money::new(100_000));
        assert!(!wallet.is_active());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut model = model();
        model.kind = "piggy_bank".to_string();

        assert_eq!(
            Wallet::try_from(model),
            Err(EngineError::Validation(
                "invalid wallet kind: piggy_bank".to_string()
            ))
        );
    }
}
