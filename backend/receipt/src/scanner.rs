//! Pipeline orchestrator: extraction then structuring, strictly in sequence.

use std::sync::Arc;

use tracing::info;

use pondo_core::{ExtractModel, ImagePayload, OcrProvider, PondoError, ReceiptRecord};

use crate::extract::TextExtractor;
use crate::structure::StructuredExtractor;

/// Chains the OCR stage into the structuring stage. The second stage
/// consumes the first stage's text, so there is nothing to parallelize.
///
/// Errors keep their stage identity ([`PondoError::stage`]), so callers can
/// tell "OCR failed" apart from "structuring failed". No partial-success
/// mode exists: the result is a complete [`ReceiptRecord`] or an error.
pub struct ReceiptScanner {
    extractor: TextExtractor,
    structurer: StructuredExtractor,
}

impl ReceiptScanner {
    pub fn new(ocr: Arc<dyn OcrProvider>, model: Arc<dyn ExtractModel>) -> Self {
        Self {
            extractor: TextExtractor::new(ocr),
            structurer: StructuredExtractor::new(model),
        }
    }

    pub async fn scan(&self, image: &ImagePayload) -> Result<ReceiptRecord, PondoError> {
        let text = self.extractor.extract(image).await?;
        let record = self.structurer.structure(&text).await?;
        info!(merchant = %record.merchant, amount = record.amount, "receipt scanned");
        Ok(record)
    }
}
