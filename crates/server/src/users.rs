//! User profile endpoints

use api_types::user::{User, UserUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// Every account. Admin only.
pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<User>>, ServerError> {
    let users = state.engine.users(&user.principal()).await?;
    Ok(Json(users.into_iter().map(views::user).collect()))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ServerError> {
    let found = state.engine.user(&user.principal(), id).await?;
    Ok(Json(views::user(found)))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<User>, ServerError> {
    let updated = state
        .engine
        .update_user(
            &user.principal(),
            id,
            engine::UserUpdate {
                full_name: payload.full_name,
                phone: payload.phone,
                business_name: payload.business_name,
                business_address: payload.business_address,
                business_registration: payload.business_registration,
            },
        )
        .await?;
    Ok(Json(views::user(updated)))
}
