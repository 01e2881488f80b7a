//! Order API endpoints

use api_types::order::{Order, OrderNew};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// Place the delivery order for contract `contract_id`.
pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(contract_id): Path<Uuid>,
    Json(payload): Json<OrderNew>,
) -> Result<Json<Order>, ServerError> {
    let order = state
        .engine
        .create_order(
            &user.principal(),
            contract_id,
            engine::NewOrder {
                delivery_address: payload.delivery_address,
                delivery_instructions: payload.delivery_instructions,
            },
        )
        .await?;
    Ok(Json(views::order(order)))
}

pub async fn confirm(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ServerError> {
    let order = state.engine.confirm_order(&user.principal(), id).await?;
    Ok(Json(views::order(order)))
}

/// Mark delivered; the escrow is released in the same step.
pub async fn deliver(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ServerError> {
    let order = state.engine.deliver_order(&user.principal(), id).await?;
    Ok(Json(views::order(order)))
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Order>>, ServerError> {
    let orders = state.engine.orders(&user.principal()).await?;
    Ok(Json(orders.into_iter().map(views::order).collect()))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ServerError> {
    let order = state.engine.order(&user.principal(), id).await?;
    Ok(Json(views::order(order)))
}
