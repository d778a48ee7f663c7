//! Route modules for the OCR proxy server

pub mod health;
pub mod ocr;

use axum::Router;

use crate::state::AppState;

/// Assemble all routes over the shared state
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest("/api/v1/health", health::router())
        .nest("/api/v1/ocr", ocr::router())
        .with_state(state)
}
