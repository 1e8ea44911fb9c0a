//! Structured extraction stage: OCR text in, validated [`ReceiptRecord`] out.
//!
//! The model is instructed to answer with one JSON object; this stage owns
//! parsing and validating that object. Missing or out-of-set fields fail the
//! stage; a partially populated record is never returned.

use std::sync::Arc;

use tracing::debug;

use pondo_core::{ExtractModel, ModelRequest, PondoError, ReceiptRecord};

/// Fixed instruction template for the structuring model. The JSON shape it
/// demands is a compatibility contract with downstream `ReceiptRecord`
/// consumers; change it only together with them.
const STRUCTURING_PROMPT: &str = "\
You are a receipt parser for a Philippine personal-finance app. \
Given the raw OCR text of a receipt, respond with exactly one JSON object \
and nothing else, in this shape:
{
  \"merchant\": \"<store name>\",
  \"amount\": <total amount as a number>,
  \"date\": \"<YYYY-MM-DD>\",
  \"items\": [\"<line item>\", ...],
  \"category\": \"<one of: Food & Dining, Transportation, Shopping, Entertainment, Bills & Utilities, Health, Education, Other>\",
  \"paymentMethod\": \"<one of: Cash, GCash, Maya, Credit Card, Debit Card, Bank Transfer, Other>\"
}
Use the receipt's printed total for amount. Do not invent values that are \
not on the receipt.";

const MAX_TOKENS: u32 = 512;
const TEMPERATURE: f32 = 0.0;

pub struct StructuredExtractor {
    model: Arc<dyn ExtractModel>,
}

impl StructuredExtractor {
    pub fn new(model: Arc<dyn ExtractModel>) -> Self {
        Self { model }
    }

    /// One model call, then schema validation. Single attempt, no retry,
    /// no guess-filling: any parse or validation failure is
    /// [`PondoError::Structuring`].
    pub async fn structure(&self, ocr_text: &str) -> Result<ReceiptRecord, PondoError> {
        let request = ModelRequest {
            system_prompt: STRUCTURING_PROMPT.to_string(),
            user_prompt: ocr_text.to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .model
            .complete(&request)
            .await
            .map_err(|e| PondoError::Structuring(e.to_string()))?;

        debug!(
            provider = %response.provider,
            tokens = response.tokens_used,
            latency_ms = response.latency_ms,
            "structuring model responded"
        );

        parse_receipt(&response.content)
    }
}

/// Parse model output into a `ReceiptRecord`, enforcing the closed category
/// and payment-method sets (via their serde representations) and the
/// non-negative amount invariant.
pub fn parse_receipt(raw: &str) -> Result<ReceiptRecord, PondoError> {
    let body = strip_code_fences(raw);
    let record: ReceiptRecord = serde_json::from_str(body)
        .map_err(|e| PondoError::Structuring(format!("model output failed validation: {e}")))?;

    if record.amount < 0.0 {
        return Err(PondoError::Structuring(format!(
            "negative amount: {}",
            record.amount
        )));
    }
    Ok(record)
}

/// Models often wrap JSON answers in markdown fences; strip one outer pair.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockModel;
    use pondo_core::{ExpenseCategory, PaymentMethod};

    const JOLLIBEE_JSON: &str = r#"{
        "merchant": "Jollibee Ayala Triangle",
        "amount": 185.50,
        "date": "2025-06-02",
        "items": ["Chickenjoy w/ Rice", "Coke Float"],
        "category": "Food & Dining",
        "paymentMethod": "GCash"
    }"#;

    #[tokio::test]
    async fn structures_jollibee_receipt() {
        let extractor = StructuredExtractor::new(Arc::new(MockModel::with_response(
            JOLLIBEE_JSON,
        )));
        let record = extractor
            .structure("JOLLIBEE Ayala Triangle\nChickenjoy w/ Rice 110.00\nCoke Float 75.50\nTOTAL 185.50\nGCASH")
            .await
            .unwrap();
        assert_eq!(record.merchant, "Jollibee Ayala Triangle");
        assert_eq!(record.amount, 185.50);
        assert_eq!(record.category, ExpenseCategory::FoodDining);
        assert_eq!(record.payment_method, PaymentMethod::GCash);
        assert_eq!(record.items.len(), 2);
    }

    #[tokio::test]
    async fn fenced_output_is_accepted() {
        let fenced = format!("```json\n{JOLLIBEE_JSON}\n```");
        let extractor = StructuredExtractor::new(Arc::new(MockModel::with_response(fenced)));
        let record = extractor.structure("whatever").await.unwrap();
        assert_eq!(record.amount, 185.50);
    }

    #[tokio::test]
    async fn missing_field_fails_whole_stage() {
        // No paymentMethod: must fail rather than fill a default.
        let partial = r#"{"merchant": "SM", "amount": 10.0, "date": "2025-01-01",
                          "items": [], "category": "Shopping"}"#;
        let extractor = StructuredExtractor::new(Arc::new(MockModel::with_response(partial)));
        let err = extractor.structure("x").await.unwrap_err();
        assert_eq!(err.stage(), Some("structuring"));
    }

    #[tokio::test]
    async fn out_of_set_category_rejected() {
        let bad = r#"{"merchant": "SM", "amount": 10.0, "date": "2025-01-01",
                      "items": [], "category": "Groceries", "paymentMethod": "Cash"}"#;
        let extractor = StructuredExtractor::new(Arc::new(MockModel::with_response(bad)));
        assert!(matches!(
            extractor.structure("x").await,
            Err(PondoError::Structuring(_))
        ));
    }

    #[test]
    fn negative_amount_rejected() {
        let bad = r#"{"merchant": "SM", "amount": -5.0, "date": "2025-01-01",
                      "items": [], "category": "Shopping", "paymentMethod": "Cash"}"#;
        assert!(matches!(parse_receipt(bad), Err(PondoError::Structuring(_))));
    }

    #[test]
    fn strips_plain_fences() {
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }
}
