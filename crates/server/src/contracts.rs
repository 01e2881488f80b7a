//! Contract API endpoints

use api_types::contract::Contract;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// Form a contract from the accepted offer `offer_id`.
pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(offer_id): Path<Uuid>,
) -> Result<Json<Contract>, ServerError> {
    let contract = state
        .engine
        .create_contract(&user.principal(), offer_id)
        .await?;
    Ok(Json(views::contract(contract)))
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Contract>>, ServerError> {
    let contracts = state.engine.contracts(&user.principal()).await?;
    Ok(Json(contracts.into_iter().map(views::contract).collect()))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Contract>, ServerError> {
    let contract = state.engine.contract(&user.principal(), id).await?;
    Ok(Json(views::contract(contract)))
}
