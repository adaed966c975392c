use std::ffi::OsString;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::interfaces::adapters::OcrService;
use crate::core::models::{EngineSettings, OcrResult};
use crate::global_constants;

/// Reads the image path, runs one recognition pass and prints what came back.
pub struct OcrOrchestrator {
    settings: EngineSettings,
}

impl OcrOrchestrator {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// `args` is the full argument list including the program name. The engine is only
    /// built once an image path is known.
    pub async fn run<A, F, Fut, S, W>(&self, args: A, build_service: F, writer: &mut W) -> Result<usize>
    where
        A: IntoIterator<Item = OsString>,
        F: FnOnce(EngineSettings) -> Fut,
        Fut: Future<Output = Result<S>>,
        S: OcrService,
        W: Write,
    {
        let image_path = image_path_from_args(args)?;
        log::info!("[ORCHESTRATOR] Recognizing text in {:?}", image_path);

        let service = build_service(self.settings.clone()).await?;

        let result = service
            .recognize(&image_path, self.settings.classify_orientation)
            .await?;

        if result.is_empty() {
            log::info!("[ORCHESTRATOR] No text detected");
        } else {
            log::info!(
                "[ORCHESTRATOR] Engine returned {} lines with {} entries",
                result.lines.len(),
                result.entry_count()
            );
        }

        write_recognized_text(&result, writer)
    }
}

pub fn image_path_from_args<A>(args: A) -> Result<PathBuf>
where
    A: IntoIterator<Item = OsString>,
{
    let image_path = args
        .into_iter()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Missing image path argument. {}", global_constants::USAGE))?;

    Ok(PathBuf::from(image_path))
}

pub fn write_recognized_text<W: Write>(result: &OcrResult, writer: &mut W) -> Result<usize> {
    write!(writer, "{}", result).context("Failed to write recognized text")?;
    Ok(result.entry_count())
}
