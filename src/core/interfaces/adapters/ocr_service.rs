use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::OcrResult;

#[async_trait]
pub trait OcrService: Send + Sync {
    /// Runs the engine over the image at `image_path`. With `classify_orientation`
    /// set, rotated text regions are corrected before recognition.
    async fn recognize(&self, image_path: &Path, classify_orientation: bool) -> Result<OcrResult>;
}
