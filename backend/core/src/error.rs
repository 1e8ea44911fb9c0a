use thiserror::Error;

/// Top-level error type for the Pondo backend.
#[derive(Debug, Error)]
pub enum PondoError {
    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("structured extraction failed: {0}")]
    Structuring(String),

    #[error("context build failed: {0}")]
    ContextBuild(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PondoError {
    /// Which pipeline stage produced this error, if any.
    ///
    /// Callers use this to tell "OCR failed" apart from "structuring failed"
    /// without matching on the full enum.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            PondoError::Extraction(_) => Some("extraction"),
            PondoError::Structuring(_) => Some("structuring"),
            _ => None,
        }
    }
}
