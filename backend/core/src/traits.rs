use anyhow::Result;
use async_trait::async_trait;

/// An image payload handed to the scan pipeline: raw bytes plus the MIME
/// type the caller claimed for them.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Trait for OCR providers used by the text extraction stage.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Provider name (e.g., "ocrspace", "mock").
    fn name(&self) -> &str;

    /// Recognize text in the given image, best-effort. Single attempt.
    async fn recognize(&self, image: &ImagePayload) -> Result<String>;
}

/// Trait for generative models used by the structured extraction stage.
#[async_trait]
pub trait ExtractModel: Send + Sync {
    /// Provider name (e.g., "gemini", "mock").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse>;
}

/// Request to a generative model.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from a generative model.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub content: String,
    pub provider: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}
