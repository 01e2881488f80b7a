//! Farm API endpoints

use api_types::farm::{Farm, FarmNew, FarmUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// Register a farm for the calling (verified) farmer.
pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<FarmNew>,
) -> Result<Json<Farm>, ServerError> {
    let farm = state
        .engine
        .create_farm(
            &user.principal(),
            engine::NewFarm {
                name: payload.name,
                description: payload.description,
                location: payload.location,
                size_hectares: payload.size_hectares,
                soil_type: payload.soil_type,
                irrigation_type: payload.irrigation_type,
            },
        )
        .await?;
    Ok(Json(views::farm(farm)))
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Farm>>, ServerError> {
    let farms = state.engine.farms(&user.principal()).await?;
    Ok(Json(farms.into_iter().map(views::farm).collect()))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Farm>, ServerError> {
    let farm = state.engine.farm(&user.principal(), id).await?;
    Ok(Json(views::farm(farm)))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FarmUpdate>,
) -> Result<Json<Farm>, ServerError> {
    let farm = state
        .engine
        .update_farm(
            &user.principal(),
            id,
            engine::FarmUpdate {
                name: payload.name,
                description: payload.description,
                location: payload.location,
                size_hectares: payload.size_hectares,
                soil_type: payload.soil_type,
                irrigation_type: payload.irrigation_type,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(views::farm(farm)))
}
