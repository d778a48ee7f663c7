//! OCR Types
//!
//! Shapes shared by the providers, the reconciliation step and the HTTP layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Source label of the best result when every provider failed
pub const NO_SOURCE: &str = "none";

/// OCR provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// AWS Textract `DetectDocumentText`
    Textract,
    /// AWS Rekognition `DetectText`
    Rekognition,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Textract => "textract",
            Self::Rekognition => "rekognition",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "textract" => Ok(Self::Textract),
            "rekognition" => Ok(Self::Rekognition),
            other => Err(other.to_string()),
        }
    }
}

/// Granularity a provider attached to a detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Word,
    Line,
    Other,
}

/// A single detection as reported by a provider
#[derive(Debug, Clone)]
pub struct Detection {
    pub text: String,
    pub granularity: Granularity,
    /// Provider confidence on a 0-100 scale
    pub confidence: f64,
}

impl Detection {
    pub fn word(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            granularity: Granularity::Word,
            confidence,
        }
    }
}

/// Native response of a provider call
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub detections: Vec<Detection>,
    /// Unprocessed response, passed through to the caller
    pub raw: Value,
}

/// Text and confidence derived from the word-level detections of a response
#[derive(Debug, Clone, PartialEq)]
pub struct WordSummary {
    pub text: String,
    /// Mean word confidence on a 0-1 scale
    pub confidence: f64,
    pub word_count: usize,
}

impl WordSummary {
    /// Summarize the word-level detections, keeping provider order.
    pub fn from_detections(detections: &[Detection]) -> Self {
        let mut text = String::new();
        let mut total_confidence = 0.0;
        let mut word_count = 0usize;

        for detection in detections
            .iter()
            .filter(|d| d.granularity == Granularity::Word)
        {
            text.push_str(&detection.text);
            text.push(' ');
            total_confidence += detection.confidence;
            word_count += 1;
        }

        let average = if word_count > 0 {
            total_confidence / word_count as f64
        } else {
            0.0
        };

        Self {
            text: text.trim().to_string(),
            confidence: average / 100.0,
            word_count,
        }
    }
}

/// Outcome of one provider invocation
///
/// Only [`ProviderResult::succeeded`] and [`ProviderResult::failed`] build
/// values, so the success fields and `error` are never populated together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResult {
    success: bool,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_data: Option<Value>,
}

impl ProviderResult {
    pub fn succeeded(source: impl Into<String>, summary: WordSummary, raw_data: Value) -> Self {
        Self {
            success: true,
            source: source.into(),
            text: Some(summary.text),
            confidence: Some(summary.confidence),
            word_count: Some(summary.word_count),
            error: None,
            raw_data: Some(raw_data),
        }
    }

    pub fn failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            source: source.into(),
            text: None,
            confidence: None,
            word_count: None,
            error: Some(error.into()),
            raw_data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Recognized text, empty on failure
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Normalized confidence, 0 on failure
    pub fn confidence(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }

    pub fn word_count(&self) -> usize {
        self.word_count.unwrap_or(0)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn raw_data(&self) -> Option<&Value> {
        self.raw_data.as_ref()
    }
}

/// The winning provider result, without raw data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestResult {
    pub source: String,
    pub text: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BestResult {
    /// Placeholder returned when no provider succeeded
    pub fn none() -> Self {
        Self {
            source: NO_SOURCE.to_string(),
            text: String::new(),
            confidence: 0.0,
            word_count: None,
            error: Some("All OCR services failed".to_string()),
        }
    }
}

impl From<&ProviderResult> for BestResult {
    fn from(result: &ProviderResult) -> Self {
        Self {
            source: result.source().to_string(),
            text: result.text().to_string(),
            confidence: result.confidence(),
            word_count: Some(result.word_count()),
            error: None,
        }
    }
}

/// Image format guessed from the leading characters of the base64 payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Jpeg,
    Png,
    Gif,
    Unknown,
}

impl ImageType {
    /// Sniff the type of a base64-encoded image without decoding it.
    pub fn sniff(encoded: Option<&str>) -> Self {
        match encoded {
            Some(s) if s.starts_with("/9j/") => Self::Jpeg,
            Some(s) if s.starts_with("iVBORw0KGgo") => Self::Png,
            Some(s) if s.starts_with("R0lGOD") => Self::Gif,
            _ => Self::Unknown,
        }
    }
}

/// Recognition request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognizeRequest {
    /// Base64-encoded image
    #[serde(default)]
    pub image: Option<String>,
}

/// Metadata about a processed image
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingInfo {
    pub image_size: usize,
    pub image_type: ImageType,
    /// ISO-8601 UTC timestamp
    pub timestamp: String,
    pub services_used: Vec<String>,
}

/// Payload of a successful recognition
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionData {
    pub best_result: BestResult,
    pub all_results: Vec<ProviderResult>,
    pub processing_info: ProcessingInfo,
}

/// Response envelope returned for every recognition request
#[derive(Debug, Clone, Serialize)]
pub struct RecognizeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RecognitionData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Fault category of an orchestration failure
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl RecognizeResponse {
    pub fn ok(data: RecognitionData) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            kind: None,
        }
    }

    /// Failure without a fault category, used for rejected input
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            kind: None,
        }
    }

    pub fn fault(error: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            kind: Some(kind.into()),
        }
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR provider request failed: {0}")]
    ApiError(String),

    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),

    #[error("OCR provider panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_kind() {
        assert_eq!("textract".parse::<ProviderKind>(), Ok(ProviderKind::Textract));
        assert_eq!(" Rekognition ".parse::<ProviderKind>(), Ok(ProviderKind::Rekognition));
        assert_eq!("tesseract".parse::<ProviderKind>(), Err("tesseract".to_string()));
    }

    #[test]
    fn test_word_summary_averages_confidence() {
        let detections = vec![
            Detection::word("hello", 80.0),
            Detection::word("big", 90.0),
            Detection::word("world", 100.0),
        ];

        let summary = WordSummary::from_detections(&detections);

        assert_eq!(summary.text, "hello big world");
        assert_eq!(summary.confidence, 0.9);
        assert_eq!(summary.word_count, 3);
    }

    #[test]
    fn test_word_summary_ignores_lines() {
        let detections = vec![
            Detection {
                text: "hello world".to_string(),
                granularity: Granularity::Line,
                confidence: 10.0,
            },
            Detection::word("hello", 50.0),
            Detection::word("world", 70.0),
        ];

        let summary = WordSummary::from_detections(&detections);

        assert_eq!(summary.text, "hello world");
        assert!((summary.confidence - 0.6).abs() < 1e-9);
        assert_eq!(summary.word_count, 2);
    }

    #[test]
    fn test_word_summary_without_words() {
        let detections = vec![Detection {
            text: "page".to_string(),
            granularity: Granularity::Other,
            confidence: 99.0,
        }];

        let summary = WordSummary::from_detections(&detections);

        assert_eq!(summary.text, "");
        assert_eq!(summary.confidence, 0.0);
        assert_eq!(summary.word_count, 0);
    }

    #[test]
    fn test_sniff_image_type() {
        assert_eq!(ImageType::sniff(Some("/9j/4AAQSkZJRg")), ImageType::Jpeg);
        assert_eq!(ImageType::sniff(Some("iVBORw0KGgoAAAANSUhEUg")), ImageType::Png);
        assert_eq!(ImageType::sniff(Some("R0lGODlhAQABAIAAAP")), ImageType::Gif);
        assert_eq!(ImageType::sniff(Some("UklGRh4AAABXRUJQ")), ImageType::Unknown);
        assert_eq!(ImageType::sniff(Some("")), ImageType::Unknown);
        assert_eq!(ImageType::sniff(None), ImageType::Unknown);
    }

    #[test]
    fn test_provider_result_json_shapes() {
        let ok = ProviderResult::succeeded(
            "textract",
            WordSummary {
                text: "foo".to_string(),
                confidence: 0.5,
                word_count: 1,
            },
            serde_json::json!({ "Blocks": [] }),
        );
        let failed = ProviderResult::failed("rekognition", "throttled");

        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({
                "success": true,
                "source": "textract",
                "text": "foo",
                "confidence": 0.5,
                "wordCount": 1,
                "rawData": { "Blocks": [] }
            })
        );
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({
                "success": false,
                "source": "rekognition",
                "error": "throttled"
            })
        );
        assert_eq!(failed.text(), "");
        assert_eq!(failed.confidence(), 0.0);
    }

    #[test]
    fn test_none_best_result_shape() {
        assert_eq!(
            serde_json::to_value(BestResult::none()).unwrap(),
            serde_json::json!({
                "source": "none",
                "text": "",
                "confidence": 0.0,
                "error": "All OCR services failed"
            })
        );
    }

    #[test]
    fn test_fault_envelope_shape() {
        let response = RecognizeResponse::fault("Invalid byte 33, offset 0.", "DecodeError");
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            serde_json::json!({
                "success": false,
                "error": "Invalid byte 33, offset 0.",
                "type": "DecodeError"
            })
        );
    }
}
