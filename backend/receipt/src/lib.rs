//! Receipt scan pipeline.
//!
//! An image goes through two strictly sequential stages: OCR text
//! extraction, then generative-model structuring into a validated
//! [`pondo_core::ReceiptRecord`]. [`scanner::ReceiptScanner`] is the public
//! entry point; concrete upstream providers live in [`providers`].

pub mod extract;
pub mod image;
pub mod providers;
pub mod scanner;
pub mod structure;

pub use extract::TextExtractor;
pub use image::{ALLOWED_MIME_TYPES, MAX_IMAGE_BYTES};
pub use scanner::ReceiptScanner;
pub use structure::StructuredExtractor;
