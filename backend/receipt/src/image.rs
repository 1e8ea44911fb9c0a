//! Image ingestion checks for the scan pipeline.
//!
//! Runs before any provider is invoked so a bad upload never costs an
//! upstream call.

use pondo_core::{ImagePayload, PondoError};

/// Largest accepted image payload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types the pipeline accepts. Closed list.
pub const ALLOWED_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/webp", "image/heic"];

/// Reject oversized or mistyped payloads with a client-facing error.
pub fn validate(image: &ImagePayload) -> Result<(), PondoError> {
    if image.bytes.is_empty() {
        return Err(PondoError::InvalidImage("empty image payload".to_string()));
    }
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(PondoError::InvalidImage(format!(
            "image is {} bytes, limit is {} bytes",
            image.bytes.len(),
            MAX_IMAGE_BYTES
        )));
    }
    let mime = image.mime_type.to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(PondoError::InvalidImage(format!(
            "unsupported MIME type: {}",
            image.mime_type
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(mime: &str, len: usize) -> ImagePayload {
        ImagePayload {
            bytes: vec![0u8; len],
            mime_type: mime.to_string(),
        }
    }

    #[test]
    fn accepts_allowed_types() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(validate(&payload(mime, 1024)).is_ok());
        }
    }

    #[test]
    fn rejects_unknown_mime() {
        let err = validate(&payload("image/gif", 1024)).unwrap_err();
        assert!(matches!(err, PondoError::InvalidImage(_)));
    }

    #[test]
    fn rejects_oversized_payload() {
        let err = validate(&payload("image/png", MAX_IMAGE_BYTES + 1)).unwrap_err();
        assert!(matches!(err, PondoError::InvalidImage(_)));
    }

    #[test]
    fn mime_check_is_case_insensitive() {
        assert!(validate(&payload("IMAGE/JPEG", 10)).is_ok());
    }
}
