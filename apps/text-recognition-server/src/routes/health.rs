//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub region: String,
    pub providers: Vec<String>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "text-recognition-server",
        region: state.config().aws.region.clone(),
        providers: state.ocr().services(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}
