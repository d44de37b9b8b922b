use axum::{
    extract::State,
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{instrument, warn};

use crate::config::ServerConfig;
use crate::shared::{AppError, AppState};
use crate::websockets::websocket_handler;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rooms: usize,
    pub memberships: usize,
    pub connections: usize,
}

/// GET /health
#[instrument(skip(app_state))]
pub async fn health(State(app_state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let stats = app_state
        .registry
        .stats()
        .await
        .ok_or(AppError::RegistryUnavailable)?;
    let connections = app_state.connection_manager.count_connections().await;

    Ok(Json(HealthResponse {
        status: "ok",
        rooms: stats.rooms,
        memberships: stats.memberships,
        connections,
    }))
}

/// Browser origin admission for the HTTP and WebSocket routes
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid allowed origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
}

pub fn build_router(app_state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(|| async { "Nexus chat server is running" }))
        .route("/health", get(health))
        .route("/ws", get(websocket_handler))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
