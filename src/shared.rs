use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::registry::RegistryHandle;
use crate::websockets::ConnectionManager;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub registry: RegistryHandle,
    pub connection_manager: Arc<dyn ConnectionManager>,
}

impl AppState {
    pub fn new(registry: RegistryHandle, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            registry,
            connection_manager,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Room registry unavailable")]
    RegistryUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::RegistryUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Room registry unavailable".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
