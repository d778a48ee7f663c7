//! Route modules for the text recognition server

pub mod health;
pub mod recognize;

use axum::Router;

use crate::state::AppState;

/// Assemble all routes over the shared state
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest("/api/v1/health", health::router())
        .merge(recognize::router())
        .with_state(state)
}
