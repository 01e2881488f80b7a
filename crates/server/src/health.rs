//! Liveness, readiness and service health.

use api_types::health::{Health, Liveness, Readiness, ServiceState, Services};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::{Value, json};

use crate::server::ServerState;

const API_VERSION: &str = "1.0.0";

pub async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the AgriMarket API" }))
}

/// Liveness check for load balancers; does not touch the database.
pub async fn root() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn database_state(state: &ServerState) -> ServiceState {
    match state.engine.ping().await {
        Ok(()) => ServiceState::Healthy,
        Err(err) => {
            tracing::error!("database health check failed: {err}");
            ServiceState::Unhealthy
        }
    }
}

pub async fn health(State(state): State<ServerState>) -> (StatusCode, Json<Health>) {
    let database = database_state(&state).await;
    let code = match database {
        ServiceState::Healthy => StatusCode::OK,
        ServiceState::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        code,
        Json(Health {
            status: database,
            timestamp: Utc::now(),
            version: API_VERSION.to_string(),
            services: Services {
                api: ServiceState::Healthy,
                database,
            },
        }),
    )
}

pub async fn ready(State(state): State<ServerState>) -> (StatusCode, Json<Readiness>) {
    let ready = database_state(&state).await == ServiceState::Healthy;
    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(Readiness {
            ready,
            timestamp: Utc::now(),
        }),
    )
}

pub async fn live() -> Json<Liveness> {
    Json(Liveness {
        alive: true,
        timestamp: Utc::now(),
    })
}
