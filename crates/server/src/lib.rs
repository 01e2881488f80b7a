use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use config::ServerConfig;
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};
pub use storage::FileStore;

mod auth;
mod config;
mod contracts;
mod escrow;
mod farms;
mod health;
mod kyc;
mod listings;
mod offers;
mod orders;
mod server;
mod storage;
mod token;
mod users;
mod views;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// Missing, malformed or expired credential.
    Unauthorized(String),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::ExistingKey(_)
        | EngineError::InvalidState(_)
        | EngineError::InvalidInput(_)
        | EngineError::InvalidId(_) => StatusCode::BAD_REQUEST,
        EngineError::Database(_) | EngineError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Password(hash_err) => {
            tracing::error!("password hashing error: {hash_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                message_for_engine_error(err),
            ),
            ServerError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(api_types::ErrorBody { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
