pub mod gemini;
pub mod mock;
pub mod ocrspace;

pub use gemini::GeminiModel;
pub use mock::{MockModel, MockOcr};
pub use ocrspace::OcrSpaceProvider;
