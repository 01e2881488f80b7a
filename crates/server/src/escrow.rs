//! Escrow API endpoints

use api_types::escrow::Escrow;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// Open the escrow for contract `contract_id`.
pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(contract_id): Path<Uuid>,
) -> Result<Json<Escrow>, ServerError> {
    let escrow = state
        .engine
        .create_escrow(&user.principal(), contract_id)
        .await?;
    Ok(Json(views::escrow(escrow)))
}

pub async fn fund(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Escrow>, ServerError> {
    let escrow = state.engine.fund_escrow(&user.principal(), id).await?;
    Ok(Json(views::escrow(escrow)))
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Escrow>>, ServerError> {
    let escrows = state.engine.escrows(&user.principal()).await?;
    Ok(Json(escrows.into_iter().map(views::escrow).collect()))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Escrow>, ServerError> {
    let escrow = state.engine.escrow(&user.principal(), id).await?;
    Ok(Json(views::escrow(escrow)))
}
