//! Text extraction stage: image in, best-effort recognized text out.

use std::sync::Arc;

use tracing::debug;

use pondo_core::{ImagePayload, OcrProvider, PondoError};

use crate::image;

/// Approximate upstream cost of one OCR call in USD. Documentation only;
/// nothing enforces it at runtime.
pub const OCR_COST_PER_CALL_USD: f64 = 0.000_5;

pub struct TextExtractor {
    provider: Arc<dyn OcrProvider>,
}

impl TextExtractor {
    pub fn new(provider: Arc<dyn OcrProvider>) -> Self {
        Self { provider }
    }

    /// Run one OCR pass over the image. Single attempt, no retry.
    ///
    /// Fails with [`PondoError::InvalidImage`] before the provider is
    /// called, and [`PondoError::Extraction`] when the provider errors or
    /// the image yields no text.
    pub async fn extract(&self, image: &ImagePayload) -> Result<String, PondoError> {
        image::validate(image)?;

        let text = self
            .provider
            .recognize(image)
            .await
            .map_err(|e| PondoError::Extraction(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(PondoError::Extraction(
                "no text recognized in image".to_string(),
            ));
        }

        debug!(
            provider = self.provider.name(),
            chars = text.len(),
            "OCR pass complete"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockOcr;

    fn jpeg(bytes: usize) -> ImagePayload {
        ImagePayload {
            bytes: vec![0u8; bytes],
            mime_type: "image/jpeg".to_string(),
        }
    }

    #[tokio::test]
    async fn extracts_text_from_valid_image() {
        let extractor = TextExtractor::new(Arc::new(MockOcr::with_text("TOTAL 185.50")));
        let text = extractor.extract(&jpeg(1024)).await.unwrap();
        assert_eq!(text, "TOTAL 185.50");
    }

    #[tokio::test]
    async fn provider_failure_is_extraction_error() {
        let extractor = TextExtractor::new(Arc::new(MockOcr::failing()));
        let err = extractor.extract(&jpeg(1024)).await.unwrap_err();
        assert_eq!(err.stage(), Some("extraction"));
    }

    #[tokio::test]
    async fn blank_text_is_extraction_error() {
        let extractor = TextExtractor::new(Arc::new(MockOcr::with_text("   \n ")));
        let err = extractor.extract(&jpeg(1024)).await.unwrap_err();
        assert!(matches!(err, PondoError::Extraction(_)));
    }

    #[tokio::test]
    async fn invalid_image_rejected_before_provider() {
        // A failing provider proves the provider is never reached.
        let extractor = TextExtractor::new(Arc::new(MockOcr::failing()));
        let mut image = jpeg(1024);
        image.mime_type = "application/pdf".to_string();
        let err = extractor.extract(&image).await.unwrap_err();
        assert!(matches!(err, PondoError::InvalidImage(_)));
    }
}
