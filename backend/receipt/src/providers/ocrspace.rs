use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use pondo_core::{ImagePayload, OcrProvider};

/// OCR.space text recognition provider.
pub struct OcrSpaceProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OcrSpaceProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.ocr.space/parse/image".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrResponse {
    parsed_results: Option<Vec<ParsedResult>>,
    is_errored_on_processing: bool,
    error_message: Option<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    parsed_text: String,
}

#[async_trait]
impl OcrProvider for OcrSpaceProvider {
    fn name(&self) -> &str {
        "ocrspace"
    }

    async fn recognize(&self, image: &ImagePayload) -> Result<String> {
        let start = Instant::now();
        let b64 = STANDARD.encode(&image.bytes);
        let data_url = format!("data:{};base64,{}", image.mime_type, b64);

        let form = [
            ("base64Image", data_url.as_str()),
            ("language", "eng"),
            ("OCREngine", "2"),
            ("scale", "true"),
        ];

        let response = self
            .client
            .post(&self.base_url)
            .header("apikey", &self.api_key)
            .form(&form)
            .send()
            .await
            .context("OCR.space HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("OCR.space returned {}: {}", status, error_body);
        }

        let ocr_response: OcrResponse = response
            .json()
            .await
            .context("Failed to parse OCR.space response")?;

        if ocr_response.is_errored_on_processing {
            anyhow::bail!(
                "OCR.space processing error: {}",
                ocr_response
                    .error_message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            );
        }

        let text = ocr_response
            .parsed_results
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.parsed_text)
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            chars = text.len(),
            "OCR.space call complete"
        );
        Ok(text)
    }
}
