//! OCR Service
//!
//! Runs every configured provider against an image and reconciles their
//! results.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use chrono::{SecondsFormat, Utc};
use futures::{future::join_all, FutureExt};
use tracing::Instrument;

use super::{
    provider::{panic_message, run_provider, OcrProviderTrait},
    rekognition::RekognitionProvider,
    textract::TextractProvider,
    types::{
        BestResult, ImageType, ProcessingInfo, ProviderKind, ProviderResult, RecognitionData,
        RecognizeRequest, RecognizeResponse,
    },
};
use crate::config::AwsConfig;
use crate::error::RecognizeError;

/// OCR service fanning requests out to all registered providers
pub struct OcrService {
    providers: Vec<Arc<dyn OcrProviderTrait>>,
}

impl OcrService {
    /// Create a service over providers, in registration order
    pub fn new(providers: Vec<Arc<dyn OcrProviderTrait>>) -> Self {
        Self { providers }
    }

    /// Build the AWS-backed providers named in `kinds`
    pub async fn from_aws(config: &AwsConfig, kinds: &[ProviderKind]) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut providers: Vec<Arc<dyn OcrProviderTrait>> = Vec::with_capacity(kinds.len());
        for kind in kinds {
            match kind {
                ProviderKind::Textract => {
                    let mut builder = aws_sdk_textract::config::Builder::from(&sdk_config);
                    if let Some(endpoint) = &config.textract_endpoint {
                        builder = builder.endpoint_url(endpoint);
                    }
                    let client = aws_sdk_textract::Client::from_conf(builder.build());
                    providers.push(Arc::new(TextractProvider::new(client)));
                }
                ProviderKind::Rekognition => {
                    let mut builder = aws_sdk_rekognition::config::Builder::from(&sdk_config);
                    if let Some(endpoint) = &config.rekognition_endpoint {
                        builder = builder.endpoint_url(endpoint);
                    }
                    let client = aws_sdk_rekognition::Client::from_conf(builder.build());
                    providers.push(Arc::new(RekognitionProvider::new(client)));
                }
            }
            tracing::info!("Registered OCR provider {}", kind.as_str());
        }

        Self::new(providers)
    }

    /// Identifiers of the registered providers, in registration order
    pub fn services(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.source().to_string())
            .collect()
    }

    /// Recognize text in a base64-encoded image.
    ///
    /// Always produces an envelope: rejected input and orchestration faults
    /// come back as failure envelopes rather than errors.
    pub async fn recognize(&self, request: &RecognizeRequest) -> RecognizeResponse {
        let image = match request.image.as_deref() {
            Some(image) if !image.is_empty() => image,
            _ => {
                tracing::info!("No image provided");
                return RecognizeResponse::rejected("No image provided");
            }
        };

        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("recognize", %request_id, encoded_len = image.len());

        let outcome = AssertUnwindSafe(self.process(image).instrument(span))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(RecognizeError::Internal(panic_message(panic.as_ref()))));

        let response = match outcome {
            Ok(data) => RecognizeResponse::ok(data),
            Err(e) => {
                tracing::error!(%request_id, "Recognition failed: {}", e);
                Self::fault(e)
            }
        };

        if tracing::enabled!(tracing::Level::DEBUG) {
            match serde_json::to_string(&response) {
                Ok(body) => tracing::debug!(%request_id, "Response: {}", body),
                Err(e) => tracing::debug!(%request_id, "Response not serializable: {}", e),
            }
        }

        response
    }

    /// Failure envelope for an orchestration fault
    pub fn fault(error: RecognizeError) -> RecognizeResponse {
        RecognizeResponse::fault(error.to_string(), error.category())
    }

    async fn process(&self, image: &str) -> Result<RecognitionData, RecognizeError> {
        let image_data = decode_image(image)?;
        tracing::debug!(bytes = image_data.len(), "Decoded image");

        let all_results = join_all(
            self.providers
                .iter()
                .map(|provider| run_provider(provider.as_ref(), &image_data)),
        )
        .await;

        let best_result = select_best(&all_results);
        tracing::info!(
            source = %best_result.source,
            confidence = best_result.confidence,
            "Selected OCR result"
        );

        Ok(RecognitionData {
            best_result,
            all_results,
            processing_info: ProcessingInfo {
                image_size: image_data.len(),
                image_type: ImageType::sniff(Some(image)),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                services_used: self.services(),
            },
        })
    }
}

/// Lenient decoder: padding optional, non-zero trailing bits tolerated
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a base64 payload in either the standard or the URL-safe alphabet.
///
/// Whitespace and line breaks are ignored and padding is optional.
fn decode_image(image: &str) -> Result<Vec<u8>, RecognizeError> {
    let compact: String = image
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    Ok(LENIENT.decode(compact)?)
}

/// Pick the successful result with the highest confidence.
///
/// Later results only win with a strictly greater confidence, so the first
/// of several equally confident results is kept.
pub fn select_best(results: &[ProviderResult]) -> BestResult {
    results
        .iter()
        .filter(|result| result.is_success())
        .fold(None::<&ProviderResult>, |best, current| match best {
            Some(best) if current.confidence() > best.confidence() => Some(current),
            Some(best) => Some(best),
            None => Some(current),
        })
        .map(BestResult::from)
        .unwrap_or_else(BestResult::none)
}
