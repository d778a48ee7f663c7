//! Error types for the text recognition server

use thiserror::Error;

/// Faults raised while orchestrating a recognition request
///
/// Provider failures never show up here; they are contained per provider
/// and reported inside the results.
#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("Invalid base64 image: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RecognizeError {
    /// Category reported as `type` in failure envelopes
    pub fn category(&self) -> &'static str {
        match self {
            RecognizeError::InvalidRequest(_) => "InvalidRequest",
            RecognizeError::Decode(_) => "DecodeError",
            RecognizeError::Internal(_) => "Internal",
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Unknown OCR provider: {0}")]
    UnknownProvider(String),

    #[error("No OCR providers configured")]
    NoProviders,
}
