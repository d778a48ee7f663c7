//! AWS Rekognition provider

use async_trait::async_trait;
use aws_sdk_rekognition::{
    error::DisplayErrorContext,
    operation::detect_text::DetectTextOutput,
    primitives::Blob,
    types::{Geometry, Image, TextTypes},
    Client,
};
use serde_json::{json, Value};

use super::provider::OcrProviderTrait;
use super::types::{Detection, Granularity, OcrError, ProviderResponse};

/// Rekognition `DetectText` provider
#[derive(Clone)]
pub struct RekognitionProvider {
    client: Client,
}

impl RekognitionProvider {
    pub const SOURCE: &'static str = "rekognition";

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OcrProviderTrait for RekognitionProvider {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    async fn detect(&self, image_data: &[u8]) -> Result<ProviderResponse, OcrError> {
        let image = Image::builder()
            .bytes(Blob::new(image_data.to_vec()))
            .build();

        let output = self
            .client
            .detect_text()
            .image(image)
            .send()
            .await
            .map_err(|e| {
                OcrError::ApiError(format!(
                    "Rekognition DetectText failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(to_provider_response(&output))
    }
}

pub(crate) fn to_provider_response(output: &DetectTextOutput) -> ProviderResponse {
    let detections = output
        .text_detections()
        .iter()
        .map(|detection| Detection {
            text: detection.detected_text().unwrap_or_default().to_string(),
            granularity: match detection.r#type() {
                Some(TextTypes::Word) => Granularity::Word,
                Some(TextTypes::Line) => Granularity::Line,
                _ => Granularity::Other,
            },
            confidence: detection.confidence().map(f64::from).unwrap_or(0.0),
        })
        .collect();

    ProviderResponse {
        detections,
        raw: raw_response(output),
    }
}

fn raw_response(output: &DetectTextOutput) -> Value {
    let detections: Vec<Value> = output
        .text_detections()
        .iter()
        .map(|detection| {
            json!({
                "DetectedText": detection.detected_text(),
                "Type": detection.r#type().map(|t| t.as_str()),
                "Id": detection.id(),
                "ParentId": detection.parent_id(),
                "Confidence": detection.confidence(),
                "Geometry": detection.geometry().map(raw_geometry),
            })
        })
        .collect();

    json!({
        "TextDetections": detections,
        "TextModelVersion": output.text_model_version(),
    })
}

fn raw_geometry(geometry: &Geometry) -> Value {
    let polygon: Vec<Value> = geometry
        .polygon()
        .iter()
        .map(|point| json!({ "X": point.x(), "Y": point.y() }))
        .collect();

    json!({
        "BoundingBox": geometry.bounding_box().map(|b| json!({
            "Width": b.width(),
            "Height": b.height(),
            "Left": b.left(),
            "Top": b.top(),
        })),
        "Polygon": polygon,
    })
}
