use anyhow::{bail, Result};
use async_trait::async_trait;

use pondo_core::{ExtractModel, ImagePayload, ModelRequest, ModelResponse, OcrProvider};

/// A mock OCR provider with a canned answer, or a guaranteed failure.
pub struct MockOcr {
    text: Option<String>,
    failure: String,
}

impl MockOcr {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), failure: String::new() }
    }

    /// A provider whose every call fails, for exercising error paths.
    pub fn failing() -> Self {
        Self::failing_with("mock OCR failure")
    }

    /// A failing provider with a chosen upstream message.
    pub fn failing_with(message: impl Into<String>) -> Self {
        Self { text: None, failure: message.into() }
    }
}

#[async_trait]
impl OcrProvider for MockOcr {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(&self, _image: &ImagePayload) -> Result<String> {
        match &self.text {
            Some(text) => Ok(text.clone()),
            None => bail!("{}", self.failure),
        }
    }
}

/// A mock structuring model that returns canned responses.
pub struct MockModel {
    fixed_response: Option<String>,
}

impl MockModel {
    pub fn with_response(response: impl Into<String>) -> Self {
        Self { fixed_response: Some(response.into()) }
    }

    pub fn failing() -> Self {
        Self { fixed_response: None }
    }
}

#[async_trait]
impl ExtractModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, _request: &ModelRequest) -> Result<ModelResponse> {
        match &self.fixed_response {
            Some(content) => Ok(ModelResponse {
                content: content.clone(),
                provider: "mock".to_string(),
                tokens_used: 0,
                latency_ms: 0,
            }),
            None => bail!("mock model failure"),
        }
    }
}
