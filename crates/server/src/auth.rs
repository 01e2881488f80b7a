//! Registration, login and the current-user view.

use api_types::{
    auth::{Login, Register, Token},
    user::User,
};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, token, views};

fn issue_token(state: &ServerState, user: engine::User) -> Result<Json<Token>, ServerError> {
    let (access_token, expires_in) = token::issue(
        user.id,
        &state.config.secret_key,
        state.config.access_token_expire_minutes,
    )?;

    Ok(Json(Token {
        access_token,
        token_type: "bearer".to_string(),
        expires_in,
        user: views::user(user),
    }))
}

/// Create an account and sign it in.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<Json<Token>, ServerError> {
    let user = state
        .engine
        .register(engine::NewUser {
            email: payload.email,
            username: payload.username,
            password: payload.password,
            full_name: payload.full_name,
            phone: payload.phone,
            role: views::engine_role(payload.role),
            business_name: payload.business_name,
            business_address: payload.business_address,
            business_registration: payload.business_registration,
        })
        .await?;
    tracing::info!(user = %user.id, role = %user.role, "account registered");

    issue_token(&state, user)
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<Token>, ServerError> {
    let user = state.engine.login(&payload.email, &payload.password).await?;
    issue_token(&state, user)
}

pub async fn me(Extension(user): Extension<engine::User>) -> Json<User> {
    Json(views::user(user))
}
