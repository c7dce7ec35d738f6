//! Balance reconciliation endpoints.

use api_types::sync::{SyncReportView, WalletSyncResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::User;
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    views::{correction_view, report_view},
};

pub async fn sync_wallet(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<Json<WalletSyncResponse>, ServerError> {
    state.engine.wallet(wallet_id, user.id).await?;
    let correction = state.engine.sync_wallet_balance(wallet_id).await?;
    Ok(Json(WalletSyncResponse {
        wallet_id,
        correction: correction.map(correction_view),
    }))
}

// TODO: gate behind an admin role once callers carry one.
pub async fn sync_all(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<SyncReportView>, ServerError> {
    tracing::info!(user_id = %user.id, "manual wallet balance sync requested");
    let report = state.engine.sync_all_wallet_balances().await?;
    Ok(Json(report_view(report)))
}
