//! Recognition route
//!
//! `POST /recognize` always answers 200 with an envelope; failures are
//! reported inside it.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use crate::error::RecognizeError;
use crate::ocr::{OcrService, RecognizeRequest, RecognizeResponse};
use crate::state::AppState;

/// Create the recognition router
pub fn router() -> Router<AppState> {
    Router::new().route("/recognize", post(recognize))
}

async fn recognize(
    State(state): State<AppState>,
    payload: Result<Json<RecognizeRequest>, JsonRejection>,
) -> Json<RecognizeResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Rejected recognition request: {}", rejection.body_text());
            return Json(OcrService::fault(RecognizeError::InvalidRequest(
                rejection.body_text(),
            )));
        }
    };

    tracing::info!(
        image_len = request.image.as_ref().map(|image| image.len()),
        "Recognition request received"
    );

    Json(state.ocr().recognize(&request).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Bytes;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::config::Config;
    use crate::ocr::{MockProvider, OcrProviderTrait, OcrService};
    use crate::routes::app;
    use crate::state::AppState;

    const JPEG: &str = "/9j/4AAQSkZJRgABAQAAAQABAAD/";

    fn server(providers: Vec<Arc<dyn OcrProviderTrait>>) -> TestServer {
        let state = AppState::new(Config::default(), OcrService::new(providers));
        TestServer::new(app(state)).unwrap()
    }

    #[tokio::test]
    async fn test_recognize_returns_envelope() {
        let server = server(vec![
            Arc::new(MockProvider::with_words("textract", &[("foo", 70.0)])),
            Arc::new(MockProvider::with_words("rekognition", &[("bar", 95.0)])),
        ]);

        let response = server
            .post("/recognize")
            .json(&json!({ "image": JPEG }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(
            body["data"]["bestResult"],
            json!({
                "source": "rekognition",
                "text": "bar",
                "confidence": 0.95,
                "wordCount": 1
            })
        );
        assert_eq!(body["data"]["allResults"][0]["source"], "textract");
        assert_eq!(body["data"]["allResults"][1]["source"], "rekognition");
        assert_eq!(body["data"]["allResults"][1]["rawData"], json!({ "mock": "rekognition" }));
        assert_eq!(body["data"]["processingInfo"]["imageType"], "jpeg");
        assert_eq!(
            body["data"]["processingInfo"]["servicesUsed"],
            json!(["textract", "rekognition"])
        );
    }

    #[tokio::test]
    async fn test_missing_image() {
        let server = server(vec![Arc::new(MockProvider::with_words("a", &[]))]);

        let response = server.post("/recognize").json(&json!({})).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({ "success": false, "error": "No image provided" })
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = server(vec![]);

        let response = server.post("/recognize").text("{ image").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["type"], "InvalidRequest");
    }

    #[tokio::test]
    async fn test_truncated_json_body() {
        let a = Arc::new(MockProvider::with_words("a", &[("x", 10.0)]));
        let server = server(vec![a.clone()]);

        let response = server
            .post("/recognize")
            .content_type("application/json")
            .bytes(Bytes::from_static(b"{ \"image\": \"/9j/"))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["type"], "InvalidRequest");
        assert_eq!(a.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_string_image() {
        let server = server(vec![Arc::new(MockProvider::with_words("a", &[]))]);

        let response = server.post("/recognize").json(&json!({ "image": 5 })).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["type"], "InvalidRequest");
    }

    #[tokio::test]
    async fn test_health_lists_providers() {
        let server = server(vec![Arc::new(MockProvider::with_words("textract", &[]))]);

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["region"], "eu-central-1");
        assert_eq!(body["providers"], json!(["textract"]));
    }
}
