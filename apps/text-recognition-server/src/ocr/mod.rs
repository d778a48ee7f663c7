//! OCR Module
//!
//! Runs several OCR providers over the same image and keeps the most
//! confident answer.
//!
//! Supported providers:
//! - AWS Textract (`DetectDocumentText`)
//! - AWS Rekognition (`DetectText`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use text_recognition_server::ocr::{OcrService, RecognizeRequest};
//!
//! let service = OcrService::from_aws(&config.aws, &config.ocr.providers).await;
//!
//! let response = service
//!     .recognize(&RecognizeRequest { image: Some(base64_png) })
//!     .await;
//!
//! if let Some(data) = response.data {
//!     println!("{} ({})", data.best_result.text, data.best_result.source);
//! }
//! ```

mod provider;
mod rekognition;
mod service;
mod textract;
mod types;

pub use provider::{run_provider, OcrProviderTrait};
pub use rekognition::RekognitionProvider;
pub use service::{select_best, OcrService};
pub use textract::TextractProvider;
pub use types::{
    BestResult, Detection, Granularity, ImageType, OcrError, ProcessingInfo, ProviderKind,
    ProviderResponse, ProviderResult, RecognitionData, RecognizeRequest, RecognizeResponse,
    WordSummary, NO_SOURCE,
};

#[cfg(test)]
pub(crate) use provider::MockProvider;
