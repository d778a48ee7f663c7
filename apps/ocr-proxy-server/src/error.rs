//! Error types for the OCR proxy server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("{0}")]
    Recognizer(#[from] RecognizerError),
}

/// Failures while forwarding to the text recognition server
#[derive(Error, Debug)]
pub enum RecognizerError {
    #[error("Failed to reach recognizer: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Recognizer returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid recognizer response: {0}")]
    InvalidResponse(String),
}

/// Invalid or missing configuration values
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Missing required variable {0}")]
    Missing(&'static str),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidBody(e) => {
                tracing::warn!("Unreadable request body: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Recognizer(e) => {
                tracing::error!("Recognizer error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
