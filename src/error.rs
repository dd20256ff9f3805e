use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::db::StorageError;
use crate::services::identity::{AuthFlow, IdentityError};
use crate::services::validation::ValidationError;

/// Message shown for any catalog failure; the underlying error is only logged.
pub const CATALOG_FAILURE_MESSAGE: &str = "Failed to load movies. Please try again.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Identity provider error ({0}): {1:?}")]
    Identity(AuthFlow, IdentityError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Identity(flow, err) => (err.status_code(), err.user_message(flow).to_string()),
            AppError::Catalog(_) | AppError::HttpClient(_) => {
                tracing::error!(error = %self, "Catalog request failed");
                (StatusCode::BAD_GATEWAY, CATALOG_FAILURE_MESSAGE.to_string())
            }
            AppError::Storage(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
