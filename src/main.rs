mod adapters;
mod core;
mod global_constants;

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use crate::adapters::OcrsService;
use crate::core::models::EngineSettings;
use crate::core::orchestrators::OcrOrchestrator;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    log::info!("[MAIN] Starting {}", global_constants::APPLICATION_NAME);

    let settings = EngineSettings::load().context("Failed to load settings")?;
    let orchestrator = OcrOrchestrator::new(settings);

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    let written = orchestrator
        .run(
            std::env::args_os(),
            |settings| async move { OcrsService::new(&settings).await },
            &mut writer,
        )
        .await?;

    writer.flush().context("Failed to flush standard output")?;

    log::info!("[MAIN] Printed {} recognized entries", written);
    Ok(())
}
