use std::time::Instant;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use pondo_core::{ExtractModel, ModelRequest, ModelResponse};

/// Gemini generateContent provider for the structuring stage.
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl ExtractModel for GeminiModel {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let start = Instant::now();
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = serde_json::json!({
            "system_instruction": { "parts": [{ "text": request.system_prompt }] },
            "contents": [{ "parts": [{ "text": request.user_prompt }] }],
            "generationConfig": {
                "maxOutputTokens": request.max_tokens,
                "temperature": request.temperature
            }
        });

        debug!(model = %self.model, "Sending request to Gemini");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Gemini HTTP request failed")?;

        if !resp.status().is_success() {
            bail!("Gemini error: {}", resp.text().await.unwrap_or_default());
        }

        let json: serde_json::Value =
            resp.json().await.context("Failed to parse Gemini response")?;
        let content = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .to_string();
        let tokens_used = json["usageMetadata"]["totalTokenCount"].as_u64().unwrap_or(0);

        Ok(ModelResponse {
            content,
            provider: "gemini".to_string(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
