use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::game::error::{ErrorKind, GameError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Api error: {1}")]
    Api(StatusCode, String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::Game(e) => match e.kind() {
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
                // Only transport-level input (headers, path ids) is a 400.
                ErrorKind::InvalidInput => {
                    warn!("Rejected submission: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
                ErrorKind::DataIntegrity => {
                    error!("Data integrity error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Game data is inconsistent".to_string(),
                    )
                }
            },
            ServerError::Api(status, msg) => {
                warn!("Api error {}: {}", status, msg);
                (*status, msg.clone())
            }
            ServerError::Sqlx(e) => {
                error!("Sqlx error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Migrate(e) => {
                error!("Migration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Internal(msg) => {
                error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
