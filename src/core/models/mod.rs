mod engine_settings;
mod ocr;

pub use engine_settings::EngineSettings;
pub use ocr::{BoundingBox, OcrEntry, OcrLine, OcrResult};
