#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod render;

use std::process;
use std::sync::Arc;

use anyhow::{Context, bail};
use fontscope_core::{
    Controller, FileSelection, Phase, PreviewRegistry, SharedController, UNKNOWN_ERROR_MESSAGE,
};

use crate::config::{Cli, create_identifier};
use crate::render::{render_json, render_text};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "fontscope_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "fontscope_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "fontscope_cli::config";
pub const TRACING_TARGET_ANALYSIS: &str = "fontscope_cli::analysis";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();

    let bytes = tokio::fs::read(&cli.image)
        .await
        .with_context(|| format!("failed to read {}", cli.image.display()))?;
    let selection = FileSelection::from_path(&cli.image, bytes);

    let previews = Arc::new(PreviewRegistry::new());
    let controller = SharedController::new(Controller::new(previews.clone()));

    if controller.select_file(selection).await == Phase::Errored {
        bail!(error_message(&controller).await);
    }

    let identifier = create_identifier(&cli).context("failed to create font identifier")?;
    tracing::info!(
        target: TRACING_TARGET_ANALYSIS,
        identifier = identifier.name(),
        "Analyzing image"
    );

    match controller.analyze(identifier).await {
        Some(Phase::Done) => {}
        Some(Phase::Errored) => bail!(error_message(&controller).await),
        phase => bail!("analysis did not complete (phase {phase:?})"),
    }

    let snapshot = controller.snapshot().await;
    let Some(result) = snapshot.result else {
        bail!(UNKNOWN_ERROR_MESSAGE);
    };

    let output = if cli.json {
        render_json(snapshot.file_name.as_deref(), &result)?
    } else {
        render_text(snapshot.file_name.as_deref(), &result)
    };
    println!("{}", output.trim_end());

    tracing::debug!(
        target: TRACING_TARGET_ANALYSIS,
        live_previews = previews.live_count(),
        "Analysis rendered"
    );

    Ok(())
}

/// Message of the controller's current error.
async fn error_message(controller: &SharedController) -> String {
    controller
        .inspect(|c| c.error().unwrap_or(UNKNOWN_ERROR_MESSAGE).to_owned())
        .await
}
