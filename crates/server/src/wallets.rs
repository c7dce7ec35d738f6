//! Wallets API endpoints.

use api_types::wallet::{WalletList, WalletListResponse, WalletNew, WalletUpdate, WalletView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Money, NewWalletCmd, User, WalletPatch};
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    views::{currency_from_api, wallet_kind_from_api, wallet_view},
};

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletNew>,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let mut cmd = NewWalletCmd::new(user.id, payload.name);
    if let Some(kind) = payload.kind {
        cmd = cmd.kind(wallet_kind_from_api(kind));
    }
    if let Some(currency) = payload.currency {
        cmd = cmd.currency(currency_from_api(currency));
    }
    if let Some(opening) = payload.opening_balance.as_deref() {
        cmd = cmd.opening_balance(opening.parse::<Money>()?);
    }
    cmd.category = payload.category;

    let wallet = state.engine.new_wallet(cmd).await?;
    Ok((StatusCode::CREATED, Json(wallet_view(wallet))))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(params): Query<WalletList>,
) -> Result<Json<WalletListResponse>, ServerError> {
    let wallets = state
        .engine
        .list_wallets(user.id, params.include_deleted.unwrap_or(false))
        .await?;
    Ok(Json(WalletListResponse {
        wallets: wallets.into_iter().map(wallet_view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.wallet(wallet_id, user.id).await?;
    Ok(Json(wallet_view(wallet)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<WalletUpdate>,
) -> Result<Json<WalletView>, ServerError> {
    let patch = WalletPatch {
        name: payload.name,
        kind: payload.kind.map(wallet_kind_from_api),
        category: payload.category,
    };
    if patch.is_empty() {
        return Err(ServerError::Generic(
            "provide at least one of name, kind or category".to_string(),
        ));
    }

    let wallet = state.engine.update_wallet(wallet_id, user.id, patch).await?;
    Ok(Json(wallet_view(wallet)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_wallet(wallet_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.restore_wallet(wallet_id, user.id).await?;
    Ok(Json(wallet_view(wallet)))
}
