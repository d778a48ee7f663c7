//! OCR proxy route
//!
//! Validates the incoming image and hands it to the recognizer.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the OCR router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(process_image))
}

/// Incoming OCR request
#[derive(Debug, Deserialize)]
pub struct OcrRequest {
    /// Base64-encoded image
    #[serde(default)]
    pub image: Option<String>,
}

/// Successful proxy response
#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub message: &'static str,
    /// Recognizer envelope, unchanged
    pub result: Value,
}

/// Forward an image to the recognizer
///
/// POST /api/v1/ocr `{ "image": "<base64>" }`
async fn process_image(State(state): State<AppState>, body: Bytes) -> Result<Json<OcrResponse>> {
    let request: OcrRequest = serde_json::from_slice(&body)?;

    let image = match request.image.as_deref() {
        Some(image) if !image.is_empty() => image,
        _ => return Err(AppError::BadRequest("Image is required".to_string())),
    };

    let result = state.recognizer().recognize(image).await?;

    Ok(Json(OcrResponse {
        message: "Image processed successfully",
        result,
    }))
}
