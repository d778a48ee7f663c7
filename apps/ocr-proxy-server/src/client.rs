//! Recognizer client
//!
//! Forwards images to the text recognition server and returns its envelope
//! untouched.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::RecognizerConfig;
use crate::error::RecognizerError;

/// Something that can recognize text in a base64 image
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Forward the image and return the recognizer's envelope as-is
    async fn recognize(&self, image: &str) -> Result<Value, RecognizerError>;
}

/// Recognizer reached over HTTP
pub struct HttpRecognizer {
    client: reqwest::Client,
    url: String,
}

impl HttpRecognizer {
    pub fn new(config: &RecognizerConfig) -> Result<Self, RecognizerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, image: &str) -> Result<Value, RecognizerError> {
        tracing::debug!(url = %self.url, image_len = image.len(), "Forwarding image to recognizer");

        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "image": image }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RecognizerError::Status { status, body });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| RecognizerError::InvalidResponse(e.to_string()))?;

        tracing::debug!("Recognizer response: {}", payload);
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn recognizer(server: &MockServer) -> HttpRecognizer {
        HttpRecognizer::new(&RecognizerConfig {
            url: format!("{}/recognize", server.uri()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_forwards_image_and_returns_envelope() {
        let mock_server = MockServer::start().await;
        let envelope = json!({
            "success": true,
            "data": { "bestResult": { "source": "textract", "text": "hi", "confidence": 0.9, "wordCount": 1 } }
        });

        Mock::given(method("POST"))
            .and(path("/recognize"))
            .and(body_json(json!({ "image": "/9j/abc" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = recognizer(&mock_server).recognize("/9j/abc").await.unwrap();

        assert_eq!(result, envelope);
    }

    #[tokio::test]
    async fn test_failure_envelope_is_passed_through() {
        let mock_server = MockServer::start().await;
        let envelope = json!({ "success": false, "error": "No image provided" });

        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope.clone()))
            .mount(&mock_server)
            .await;

        let result = recognizer(&mock_server).recognize("x").await.unwrap();

        assert_eq!(result, envelope);
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let err = recognizer(&mock_server).recognize("x").await.unwrap_err();

        match err {
            RecognizerError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let err = recognizer(&mock_server).recognize("x").await.unwrap_err();

        assert!(matches!(err, RecognizerError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_recognizer() {
        let recognizer = HttpRecognizer::new(&RecognizerConfig {
            url: "http://127.0.0.1:9/recognize".to_string(),
            timeout_secs: 2,
        })
        .unwrap();

        let err = recognizer.recognize("x").await.unwrap_err();

        assert!(matches!(err, RecognizerError::Transport(_)));
    }
}
