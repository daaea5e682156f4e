//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// The request body could not be parsed as the expected payload shape.
    #[error("Invalid request body")]
    MalformedBody,

    /// The payload failed server-side validation. The message is the generic
    /// wire-contract string, never field-level detail.
    #[error("{0}")]
    Validation(String),

    /// The caller identity has exhausted its window allowance.
    #[error("Too many requests. Please try again later.")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Internal server error")]
    InternalServerError,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn missing_fields() -> Self {
        AppError::Validation("All fields are required".to_string())
    }

    pub fn invalid_email() -> Self {
        AppError::Validation("Invalid email address".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MalformedBody => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            AppError::InternalServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Other(err) => {
                tracing::error!("Unexpected error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let retry_after = match &self {
            AppError::RateLimited { retry_after_seconds } => Some(*retry_after_seconds),
            _ => None,
        };

        let body = Json(json!({
            "error": error_message,
        }));

        let mut response = (status, body).into_response();

        if let Some(seconds) = retry_after {
            if let Ok(value) = seconds.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}
