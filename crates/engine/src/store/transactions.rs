use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, transactions};

/// Filters for listing transactions.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    /// Restrict to one owner.
    pub user_id: Option<Uuid>,
    /// Restrict to one wallet.
    pub wallet_id: Option<Uuid>,
    /// Restrict to one kind.
    pub kind: Option<TransactionKind>,
    /// If true, includes soft-deleted transactions (default: false).
    pub include_deleted: bool,
}

#[async_trait]
pub trait TransactionStore {
    /// Transaction by id regardless of its lifecycle.
    async fn transaction_by_id(&self, id: Uuid) -> ResultEngine<Option<Transaction>>;

    async fn create_transaction(&self, tx: &Transaction) -> ResultEngine<()>;

    /// Overwrites every mutable column of the row with `tx`.
    async fn update_transaction(&self, tx: &Transaction) -> ResultEngine<()>;

    async fn soft_delete_transaction(&self, id: Uuid, at: DateTime<Utc>) -> ResultEngine<()>;

    async fn restore_transaction(&self, id: Uuid) -> ResultEngine<()>;

    /// Every transaction of a wallet, soft-deleted ones included.
    async fn list_by_wallet(&self, wallet_id: Uuid) -> ResultEngine<Vec<Transaction>>;

    /// Every transaction of a user, soft-deleted ones included.
    async fn list_by_user(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>>;

    /// Page ordered newest first by `(created_at, id)`, starting strictly
    /// after `before`.
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        before: Option<(DateTime<Utc>, Uuid)>,
        limit: u64,
    ) -> ResultEngine<Vec<Transaction>>;
}

fn transaction_not_exists() -> EngineError {
    EngineError::KeyNotFound("transaction not exists".to_string())
}

fn collect(models: Vec<transactions::Model>) -> ResultEngine<Vec<Transaction>> {
    models.into_iter().map(Transaction::try_from).collect()
}

#[async_trait]
impl<C> TransactionStore for C
where
    C: ConnectionTrait,
{
    async fn transaction_by_id(&self, id: Uuid) -> ResultEngine<Option<Transaction>> {
        transactions::Entity::find_by_id(id.to_string())
            .one(self)
            .await?
            .map(Transaction::try_from)
            .transpose()
    }

    async fn create_transaction(&self, tx: &Transaction) -> ResultEngine<()> {
        transactions::ActiveModel::from(tx).insert(self).await?;
        Ok(())
    }

    async fn update_transaction(&self, tx: &Transaction) -> ResultEngine<()> {
        let result = transactions::Entity::update_many()
            .col_expr(transactions::Column::Name, Expr::value(tx.name.clone()))
            .col_expr(transactions::Column::Cost, Expr::value(tx.cost.minor()))
            .col_expr(transactions::Column::Kind, Expr::value(tx.kind.as_str()))
            .col_expr(transactions::Column::Note, Expr::value(tx.note.clone()))
            .col_expr(
                transactions::Column::Category,
                Expr::value(tx.category.clone()),
            )
            .col_expr(
                transactions::Column::UserId,
                Expr::value(tx.user_id.to_string()),
            )
            .col_expr(
                transactions::Column::WalletId,
                Expr::value(tx.wallet_id.to_string()),
            )
            .col_expr(transactions::Column::UpdatedAt, Expr::value(tx.updated_at))
            .filter(transactions::Column::Id.eq(tx.id.to_string()))
            .exec(self)
            .await?;
        if result.rows_affected == 0 {
            return Err(transaction_not_exists());
        }
        Ok(())
    }

    async fn soft_delete_transaction(&self, id: Uuid, at: DateTime<Utc>) -> ResultEngine<()> {
        let result = transactions::Entity::update_many()
            .col_expr(transactions::Column::DeletedAt, Expr::value(Some(at)))
            .col_expr(transactions::Column::UpdatedAt, Expr::value(at))
            .filter(transactions::Column::Id.eq(id.to_string()))
            .filter(transactions::Column::DeletedAt.is_null())
            .exec(self)
            .await?;
        if result.rows_affected == 0 {
            return Err(transaction_not_exists());
        }
        Ok(())
    }

    async fn restore_transaction(&self, id: Uuid) -> ResultEngine<()> {
        let result = transactions::Entity::update_many()
            .col_expr(
                transactions::Column::DeletedAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(transactions::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(transactions::Column::Id.eq(id.to_string()))
            .filter(transactions::Column::DeletedAt.is_not_null())
            .exec(self)
            .await?;
        if result.rows_affected == 0 {
            return Err(transaction_not_exists());
        }
        Ok(())
    }

    async fn list_by_wallet(&self, wallet_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::WalletId.eq(wallet_id.to_string()))
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Id)
            .all(self)
            .await?;
        collect(models)
    }

    async fn list_by_user(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Id)
            .all(self)
            .await?;
        collect(models)
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        before: Option<(DateTime<Utc>, Uuid)>,
        limit: u64,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(transactions::Column::UserId.eq(user_id.to_string()));
        }
        if let Some(wallet_id) = filter.wallet_id {
            query = query.filter(transactions::Column::WalletId.eq(wallet_id.to_string()));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if !filter.include_deleted {
            query = query.filter(transactions::Column::DeletedAt.is_null());
        }
        if let Some((created_at, id)) = before {
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::CreatedAt.lt(created_at))
                    .add(
                        Condition::all()
                            .add(transactions::Column::CreatedAt.eq(created_at))
                            .add(transactions::Column::Id.lt(id.to_string())),
                    ),
            );
        }

        let models = query
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit)
            .all(self)
            .await?;
        collect(models)
    }
}
