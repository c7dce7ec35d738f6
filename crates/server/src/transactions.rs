//! Transactions API endpoints

use api_types::transaction::{
    TransactionList, TransactionListResponse, TransactionNew, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{
    EngineError, Money, NewTransactionCmd, TransactionListQuery, UpdateTransactionCmd, User,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    views::{kind_from_api, transaction_detail_view, transaction_view},
};

fn parse_cost(raw: &str) -> Result<Money, ServerError> {
    Ok(raw.parse::<Money>()?)
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let cost = parse_cost(&payload.cost)?;
    let mut cmd = NewTransactionCmd::new(
        user.id,
        payload.wallet_id,
        payload.name,
        cost,
        kind_from_api(payload.kind),
    );
    cmd.note = payload.note;
    cmd.category = payload.category;

    let detail = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(transaction_detail_view(detail))))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(params): Query<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let query = TransactionListQuery {
        user_id: user.id,
        wallet_id: params.wallet_id,
        kind: params.kind.map(kind_from_api),
        include_deleted: params.include_deleted.unwrap_or(false),
        limit: params.limit,
        cursor: params.cursor,
    };
    let page = state.engine.list_transactions(&query).await?;

    Ok(Json(TransactionListResponse {
        transactions: page.transactions.into_iter().map(transaction_view).collect(),
        next_cursor: page.next_cursor,
    }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let detail = state.engine.transaction(transaction_id, user.id).await?;
    Ok(Json(transaction_detail_view(detail)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let TransactionUpdate {
        name,
        cost,
        kind,
        note,
        category,
        wallet_id,
        user_id,
    } = payload;
    if name.is_none()
        && cost.is_none()
        && kind.is_none()
        && note.is_none()
        && category.is_none()
        && wallet_id.is_none()
        && user_id.is_none()
    {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }

    // Only the owner may edit.
    let current = state
        .engine
        .transaction(transaction_id, user.id)
        .await?
        .transaction;
    // A new owner must also receive the transaction in one of their wallets.
    if user_id.is_some_and(|id| id != current.user_id)
        && wallet_id.is_none_or(|id| id == current.wallet_id)
    {
        return Err(ServerError::Engine(EngineError::Validation(
            "reassigning a transaction requires moving it to the new owner's wallet".to_string(),
        )));
    }

    let cmd = UpdateTransactionCmd {
        transaction_id,
        name,
        cost: cost.as_deref().map(parse_cost).transpose()?,
        kind: kind.map(kind_from_api),
        note,
        category,
        wallet_id,
        user_id,
    };
    let detail = state.engine.update_transaction(cmd).await?;
    Ok(Json(transaction_detail_view(detail)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.transaction(transaction_id, user.id).await?;
    state.engine.delete_transaction(transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    state.engine.transaction(transaction_id, user.id).await?;
    let detail = state.engine.restore_transaction(transaction_id).await?;
    Ok(Json(transaction_detail_view(detail)))
}
