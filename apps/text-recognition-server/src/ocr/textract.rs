//! AWS Textract provider

use async_trait::async_trait;
use aws_sdk_textract::{
    error::DisplayErrorContext,
    operation::detect_document_text::DetectDocumentTextOutput,
    primitives::Blob,
    types::{Block, BlockType, Document, Geometry},
    Client,
};
use serde_json::{json, Value};

use super::provider::OcrProviderTrait;
use super::types::{Detection, Granularity, OcrError, ProviderResponse};

/// Textract `DetectDocumentText` provider
#[derive(Clone)]
pub struct TextractProvider {
    client: Client,
}

impl TextractProvider {
    pub const SOURCE: &'static str = "textract";

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OcrProviderTrait for TextractProvider {
    fn source(&self) -> &str {
        Self::SOURCE
    }

    async fn detect(&self, image_data: &[u8]) -> Result<ProviderResponse, OcrError> {
        let document = Document::builder()
            .bytes(Blob::new(image_data.to_vec()))
            .build();

        let output = self
            .client
            .detect_document_text()
            .document(document)
            .send()
            .await
            .map_err(|e| {
                OcrError::ApiError(format!(
                    "Textract DetectDocumentText failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(to_provider_response(&output))
    }
}

/// Map a Textract response onto detections, keeping block order.
pub(crate) fn to_provider_response(output: &DetectDocumentTextOutput) -> ProviderResponse {
    let detections = output
        .blocks()
        .iter()
        .map(|block| Detection {
            text: block.text().unwrap_or_default().to_string(),
            granularity: match block.block_type() {
                Some(BlockType::Word) => Granularity::Word,
                Some(BlockType::Line) => Granularity::Line,
                _ => Granularity::Other,
            },
            confidence: block.confidence().map(f64::from).unwrap_or(0.0),
        })
        .collect();

    ProviderResponse {
        detections,
        raw: raw_response(output),
    }
}

fn raw_response(output: &DetectDocumentTextOutput) -> Value {
    let blocks: Vec<Value> = output
        .blocks()
        .iter()
        .map(raw_block)
        .collect();

    json!({
        "DocumentMetadata": {
            "Pages": output.document_metadata().and_then(|m| m.pages()),
        },
        "Blocks": blocks,
        "DetectDocumentTextModelVersion": output.detect_document_text_model_version(),
    })
}

fn raw_block(block: &Block) -> Value {
    let relationships: Vec<Value> = block
        .relationships()
        .iter()
        .map(|relationship| {
            json!({
                "Type": relationship.r#type().map(|t| t.as_str()),
                "Ids": relationship.ids(),
            })
        })
        .collect();
    let entity_types: Vec<&str> = block.entity_types().iter().map(|t| t.as_str()).collect();

    json!({
        "BlockType": block.block_type().map(|t| t.as_str()),
        "Id": block.id(),
        "Text": block.text(),
        "TextType": block.text_type().map(|t| t.as_str()),
        "Confidence": block.confidence(),
        "Geometry": block.geometry().map(raw_geometry),
        "Relationships": relationships,
        "EntityTypes": entity_types,
        "SelectionStatus": block.selection_status().map(|s| s.as_str()),
        "RowIndex": block.row_index(),
        "ColumnIndex": block.column_index(),
        "RowSpan": block.row_span(),
        "ColumnSpan": block.column_span(),
        "Page": block.page(),
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
