use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, prelude::*,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, Wallet, util::balance_out_of_range, wallets};

/// Filters for listing wallets.
#[derive(Clone, Debug, Default)]
pub struct WalletFilter {
    /// Restrict to one owner. `None` lists every wallet (reconciliation).
    pub user_id: Option<Uuid>,
    /// If true, includes soft-deleted wallets (default: false).
    pub include_deleted: bool,
}

#[async_trait]
pub trait WalletStore {
    /// Active wallet by id.
    async fn wallet_by_id(&self, id: Uuid) -> ResultEngine<Option<Wallet>>;

    /// Wallet by id regardless of its lifecycle.
    async fn wallet_by_id_any(&self, id: Uuid) -> ResultEngine<Option<Wallet>>;

    /// Active wallet of `user_id` whose name matches case-insensitively.
    async fn wallet_by_name(&self, user_id: Uuid, name: &str) -> ResultEngine<Option<Wallet>>;

    async fn create_wallet(&self, wallet: &Wallet) -> ResultEngine<()>;

    /// Overwrites the descriptive fields (name, kind, category).
    ///
    /// Balance, currency and owner are never written here.
    async fn update_wallet(&self, wallet: &Wallet) -> ResultEngine<()>;

    async fn soft_delete_wallet(&self, id: Uuid, at: DateTime<Utc>) -> ResultEngine<()>;

    async fn restore_wallet(&self, id: Uuid) -> ResultEngine<()>;

    /// Keyset page ordered by id: returns up to `limit` wallets with an id
    /// greater than `after`.
    async fn list_wallets(
        &self,
        filter: &WalletFilter,
        after: Option<Uuid>,
        limit: u64,
    ) -> ResultEngine<Vec<Wallet>>;

    /// `balance = balance + delta`, evaluated by the database.
    ///
    /// Fails with `Validation` when the result would leave the `i64` range.
    async fn adjust_wallet_balance(&self, id: Uuid, delta: Money) -> ResultEngine<()>;

    /// Sets the balance only if it still equals `expected`.
    ///
    /// Returns `false` when the stored balance moved in the meantime.
    async fn set_wallet_balance_if(
        &self,
        id: Uuid,
        expected: Money,
        balance: Money,
    ) -> ResultEngine<bool>;
}

fn wallet_not_exists() -> EngineError {
    EngineError::KeyNotFound("wallet not exists".to_string())
}

#[async_trait]
impl<C> WalletStore for C
where
    C: ConnectionTrait,
{
    async fn wallet_by_id(&self, id: Uuid) -> ResultEngine<Option<Wallet>> {
        wallets::Entity::find_by_id(id.to_string())
            .filter(wallets::Column::DeletedAt.is_null())
            .one(self)
            .await?
            .map(Wallet::try_from)
            .transpose()
    }

    async fn wallet_by_id_any(&self, id: Uuid) -> ResultEngine<Option<Wallet>> {
        wallets::Entity::find_by_id(id.to_string())
            .one(self)
            .await?
            .map(Wallet::try_from)
            .transpose()
    }

    async fn wallet_by_name(&self, user_id: Uuid, name: &str) -> ResultEngine<Option<Wallet>> {
        wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .filter(wallets::Column::DeletedAt.is_null())
            .filter(
                Expr::expr(Func::lower(Expr::col(wallets::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(self)
            .await?
            .map(Wallet::try_from)
            .transpose()
    }

    async fn create_wallet(&self, wallet: &Wallet) -> ResultEngine<()> {
        wallets::ActiveModel::from(wallet).insert(self).await?;
        Ok(())
    }

    async fn update_wallet(&self, wallet: &Wallet) -> ResultEngine<()> {
        let active = wallets::ActiveModel {
            id: ActiveValue::Unchanged(wallet.id.to_string()),
            name: ActiveValue::Set(wallet.name.clone()),
            kind: ActiveValue::Set(wallet.kind.as_str().to_string()),
            category: ActiveValue::Set(wallet.category.clone()),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        active.update(self).await?;
        Ok(())
    }

    async fn soft_delete_wallet(&self, id: Uuid, at: DateTime<Utc>) -> ResultEngine<()> {
        let result = wallets::Entity::update_many()
            .col_expr(wallets::Column::DeletedAt, Expr::value(Some(at)))
            .col_expr(wallets::Column::UpdatedAt, Expr::value(at))
            .filter(wallets::Column::Id.eq(id.to_string()))
            .filter(wallets::Column::DeletedAt.is_null())
            .exec(self)
            .await?;
        if result.rows_affected == 0 {
            return Err(wallet_not_exists());
        }
        Ok(())
    }

    async fn restore_wallet(&self, id: Uuid) -> ResultEngine<()> {
        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::DeletedAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wallets::Column::Id.eq(id.to_string()))
            .filter(wallets::Column::DeletedAt.is_not_null())
            .exec(self)
            .await?;
        if result.rows_affected == 0 {
            return Err(wallet_not_exists());
        }
        Ok(())
    }

    async fn list_wallets(
        &self,
        filter: &WalletFilter,
        after: Option<Uuid>,
        limit: u64,
    ) -> ResultEngine<Vec<Wallet>> {
        let mut query = wallets::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(wallets::Column::UserId.eq(user_id.to_string()));
        }
        if !filter.include_deleted {
            query = query.filter(wallets::Column::DeletedAt.is_null());
        }
        if let Some(after) = after {
            query = query.filter(wallets::Column::Id.gt(after.to_string()));
        }

        query
            .order_by_asc(wallets::Column::Id)
            .limit(limit)
            .all(self)
            .await?
            .into_iter()
            .map(Wallet::try_from)
            .collect()
    }

    async fn adjust_wallet_balance(&self, id: Uuid, delta: Money) -> ResultEngine<()> {
        let mut update = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).add(delta.minor()),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wallets::Column::Id.eq(id.to_string()));
        // SQLite turns an overflowing integer sum into REAL; only touch rows
        // whose new balance stays in range.
        update = if delta.is_negative() {
            update.filter(wallets::Column::Balance.gte(i64::MIN - delta.minor()))
        } else {
            update.filter(wallets::Column::Balance.lte(i64::MAX - delta.minor()))
        };

        let result = update.exec(self).await?;
        if result.rows_affected == 0 {
            let exists = wallets::Entity::find_by_id(id.to_string())
                .count(self)
                .await?
                > 0;
            return Err(if exists {
                balance_out_of_range()
            } else {
                wallet_not_exists()
            });
        }
        Ok(())
    }

    async fn set_wallet_balance_if(
        &self,
        id: Uuid,
        expected: Money,
        balance: Money,
    ) -> ResultEngine<bool> {
        let result = wallets::Entity::update_many()
            .col_expr(wallets::Column::Balance, Expr::value(balance.minor()))
            .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wallets::Column::Id.eq(id.to_string()))
            .filter(wallets::Column::Balance.eq(expected.minor()))
            .exec(self)
            .await?;
        Ok(result.rows_affected == 1)
    }
}
