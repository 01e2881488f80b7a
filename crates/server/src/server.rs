use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use std::sync::Arc;

use crate::{
    ServerConfig, ServerError, auth, contracts, escrow, farms, health, kyc, listings, offers,
    orders, storage::FileStore, token, users,
};
use engine::Engine;

/// KYC uploads carry up to three scanned documents.
const UPLOAD_BODY_LIMIT: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub config: Arc<ServerConfig>,
    pub store: FileStore,
}

impl ServerState {
    pub fn new(engine: Engine, config: ServerConfig) -> Self {
        Self {
            store: FileStore::new(config.storage_dir.clone()),
            engine: Arc::new(engine),
            config: Arc::new(config),
        }
    }
}

/// Resolve the bearer credential into the calling [`engine::User`].
async fn require_bearer(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(ServerError::Unauthorized("Not authenticated".to_string()));
    };

    let user_id = token::verify(bearer.token(), &state.config.secret_key)?;
    let user = state.engine.authenticate(user_id).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Explicit origins only: a wildcard cannot be combined with credentials.
fn allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| {
            if origin.trim() == "*" {
                tracing::warn!("ignoring wildcard CORS origin, list origins explicitly");
                return None;
            }
            match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("ignoring invalid CORS origin {origin:?}");
                    None
                }
            }
        })
        .collect()
}

fn cors(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins(origins)))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/users", get(users::list))
        .route("/users/{id}", get(users::get).put(users::update))
        .route("/farms", post(farms::create).get(farms::list))
        .route("/farms/{id}", get(farms::get).put(farms::update))
        .route("/listings", post(listings::create).get(listings::list))
        .route("/listings/{id}", get(listings::get).put(listings::update))
        .route("/offers", post(offers::create).get(offers::list))
        .route("/offers/{id}", get(offers::get))
        .route("/offers/{id}/accept", post(offers::accept))
        .route("/contracts", get(contracts::list))
        .route("/contracts/{id}", get(contracts::get))
        .route("/contracts/{id}/create", post(contracts::create))
        .route("/escrow", get(escrow::list))
        .route("/escrow/{id}", get(escrow::get))
        .route("/escrow/{id}/create", post(escrow::create))
        .route("/escrow/{id}/fund", post(escrow::fund))
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::get))
        .route("/orders/{id}/create", post(orders::create))
        .route("/orders/{id}/confirm", post(orders::confirm))
        .route("/orders/{id}/deliver", post(orders::deliver))
        .route(
            "/kyc/upload",
            post(kyc::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/kyc/status", get(kyc::status))
        .route("/kyc/admin/queue", get(kyc::queue))
        .route("/kyc/admin/{id}/review", put(kyc::review))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::root))
        .nest("/api/v1", public.merge(protected))
        .nest_service("/storage", ServeDir::new(state.store.root()))
        .layer(cors(&state.config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState::new(engine, config))).await
}

pub fn spawn_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_and_invalid_origins_are_dropped() {
        let origins = [
            "*".to_string(),
            "http://localhost:3000".to_string(),
            "bad\norigin".to_string(),
        ];
        assert_eq!(
            allowed_origins(&origins),
            vec![HeaderValue::from_static("http://localhost:3000")]
        );
        // Building the layer must not panic on the wildcard.
        let _ = cors(&origins);
    }
}
