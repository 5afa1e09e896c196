//! Main application entry point

use anyhow::{Context as _, Result};
use eframe::egui;
use tracing::info;

use deck_core::{DeckConfig, Presentation};

mod app;
mod keys;

use app::DeckApp;

/// Config from the first command-line argument, or the stock deck
fn load_config() -> Result<DeckConfig> {
    match std::env::args().nth(1) {
        Some(path) => DeckConfig::load(&path).with_context(|| format!("failed to load deck config {}", path)),
        None => Ok(DeckConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = load_config()?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    // Configuration errors abort startup
    let presentation = Presentation::with_runtime(config, runtime.handle().clone())?;
    info!(slides = presentation.deck_state().slide_count, "starting deck");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        ..Default::default()
    };

    eframe::run_native(
        "GPU-as-a-Service",
        options,
        Box::new(move |cc| Box::new(DeckApp::new(cc, presentation, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
