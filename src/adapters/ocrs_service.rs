use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::{imageops, RgbImage};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams, TextItem};
use rten::Model;

use crate::core::interfaces::adapters::OcrService;
use crate::core::models::{BoundingBox, EngineSettings, OcrEntry, OcrLine, OcrResult};
use crate::global_constants;

pub struct OcrsService {
    engine: Arc<OcrEngine>,
}

impl OcrsService {
    pub async fn new(settings: &EngineSettings) -> Result<Self> {
        log::info!("[OCRS] Initializing OCRS service");

        let models_dir = settings.resolve_models_dir();
        log::debug!("[OCRS] Models directory: {:?}", models_dir);

        tokio::fs::create_dir_all(&models_dir)
            .await
            .with_context(|| format!("Failed to create models directory {:?}", models_dir))?;

        let detection_model_path = models_dir.join(global_constants::DETECTION_MODEL_FILE_NAME);
        let recognition_model_path = models_dir.join(global_constants::RECOGNITION_MODEL_FILE_NAME);

        Self::ensure_model_exists(&detection_model_path, &settings.detection_model_url).await?;
        Self::ensure_model_exists(&recognition_model_path, &settings.recognition_model_url).await?;

        log::debug!("[OCRS] Loading models...");
        let detection_model = Model::load_file(&detection_model_path)
            .context("Failed to load text detection model")?;
        let recognition_model = Model::load_file(&recognition_model_path)
            .context("Failed to load text recognition model")?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .context("Failed to create OCR engine")?;

        log::info!("[OCRS] Service initialized successfully");
        Ok(Self::from_engine(engine))
    }

    pub fn from_engine(engine: OcrEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    async fn ensure_model_exists(path: &Path, url: &str) -> Result<()> {
        if path.exists() {
            log::debug!("[OCRS] Using cached model {:?}", path);
            return Ok(());
        }

        log::info!("[OCRS] Downloading model from {} to {:?}", url, path);
        let response = reqwest::get(url)
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Failed to download model from {}", url))?;
        let bytes = response.bytes().await.context("Failed to get model bytes")?;

        // A partial file would be picked up as cached on the next run.
        let partial_path = partial_download_path(path);
        tokio::fs::write(&partial_path, &bytes)
            .await
            .context("Failed to write model file")?;
        tokio::fs::rename(&partial_path, path)
            .await
            .context("Failed to move downloaded model into place")?;

        log::info!("[OCRS] Model downloaded successfully ({} bytes)", bytes.len());
        Ok(())
    }
}

fn partial_download_path(path: &Path) -> PathBuf {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    PathBuf::from(partial)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageOrientation {
    #[default]
    Upright,
    Rotated180,
}

/// The pixel buffers handed to the recognizer. With classification on, the image is also
/// tried upside down so inverted scans can be read.
pub fn orientation_candidates(
    image: RgbImage,
    classify_orientation: bool,
) -> Vec<(ImageOrientation, RgbImage)> {
    if !classify_orientation {
        return vec![(ImageOrientation::Upright, image)];
    }

    let rotated = imageops::rotate180(&image);
    vec![
        (ImageOrientation::Upright, image),
        (ImageOrientation::Rotated180, rotated),
    ]
}

/// Alphanumeric characters count for a reading, punctuation and symbols count against it.
/// Inverted text comes back from the recognizer as symbol soup, so it scores low.
pub fn legibility_score(result: &OcrResult) -> i64 {
    result
        .texts()
        .flat_map(str::chars)
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| if ch.is_alphanumeric() { 1 } else { -1 })
        .sum()
}

/// Keeps the most legible reading. Ties go to the earlier candidate, so an upright
/// reading wins over its rotated twin.
pub fn select_most_legible(
    readings: Vec<(ImageOrientation, OcrResult)>,
) -> Option<(ImageOrientation, OcrResult)> {
    let mut best: Option<(ImageOrientation, OcrResult, i64)> = None;

    for (orientation, result) in readings {
        let score = legibility_score(&result);
        log::debug!("[OCRS] {:?} reading scored {}", orientation, score);

        let is_better = match &best {
            Some((_, _, best_score)) => score > *best_score,
            None => true,
        };
        if is_better {
            best = Some((orientation, result, score));
        }
    }

    best.map(|(orientation, result, _)| (orientation, result))
}

/// Maps a box found in the 180° rotated image back onto the original image.
pub fn unrotate_bounds(bounds: BoundingBox, image_width: f32, image_height: f32) -> BoundingBox {
    BoundingBox::new(
        image_width - bounds.x - bounds.width,
        image_height - bounds.y - bounds.height,
        bounds.width,
        bounds.height,
    )
}

/// Builds a result line from recognized words, dropping blank ones. Returns `None` when
/// nothing readable is left.
pub fn build_ocr_line<I>(words: I) -> Option<OcrLine>
where
    I: IntoIterator<Item = (String, BoundingBox)>,
{
    let entries: Vec<OcrEntry> = words
        .into_iter()
        .filter(|(text, _)| !text.trim().is_empty())
        .map(|(text, bounds)| OcrEntry::new(text, global_constants::UNSCORED_CONFIDENCE, bounds))
        .collect();

    if entries.is_empty() {
        None
    } else {
        Some(OcrLine::new(entries))
    }
}

impl OcrsService {
    fn recognize_image(&self, rgb_image: &RgbImage) -> Result<OcrResult> {
        let image_source = ImageSource::from_bytes(rgb_image.as_raw(), rgb_image.dimensions())
            .context("Failed to wrap image for OCR")?;
        let ocr_input = self
            .engine
            .prepare_input(image_source)
            .context("Failed to prepare image for OCR")?;

        let word_rects = self
            .engine
            .detect_words(&ocr_input)
            .context("Failed to detect text")?;
        log::debug!("[OCRS] Detected {} word regions", word_rects.len());

        let line_rects = self.engine.find_text_lines(&ocr_input, &word_rects);
        let line_texts = self
            .engine
            .recognize_text(&ocr_input, &line_rects)
            .context("Failed to recognize text")?;

        let lines: Vec<OcrLine> = line_texts
            .iter()
            .flatten()
            .filter_map(|line| {
                build_ocr_line(line.words().map(|word| {
                    let word_bbox = word.bounding_rect();
                    (
                        word.to_string(),
                        BoundingBox::new(
                            word_bbox.left() as f32,
                            word_bbox.top() as f32,
                            word_bbox.width() as f32,
                            word_bbox.height() as f32,
                        ),
                    )
                }))
            })
            .collect();

        Ok(OcrResult::new(lines))
    }
}

#[async_trait]
impl OcrService for OcrsService {
    async fn recognize(&self, image_path: &Path, classify_orientation: bool) -> Result<OcrResult> {
        log::info!("[OCRS] Starting text extraction for {:?}", image_path);

        let rgb_image = image::open(image_path)
            .with_context(|| format!("Failed to open image {:?}", image_path))?
            .into_rgb8();
        let (width, height) = rgb_image.dimensions();
        log::debug!("[OCRS] Image dimensions: {}x{}", width, height);

        let mut readings = Vec::new();
        for (orientation, candidate) in orientation_candidates(rgb_image, classify_orientation) {
            readings.push((orientation, self.recognize_image(&candidate)?));
        }

        let (orientation, mut result) = select_most_legible(readings).unwrap_or_default();

        if orientation == ImageOrientation::Rotated180 {
            log::info!("[OCRS] Image classified as upside down");
            for entry in result.lines.iter_mut().flat_map(|line| line.entries.iter_mut()) {
                entry.bounds = unrotate_bounds(entry.bounds, width as f32, height as f32);
            }
        }

        log::info!(
            "[OCRS] Extraction complete. Found {} lines, {} entries",
            result.lines.len(),
            result.entry_count()
        );

        Ok(result)
    }
}
