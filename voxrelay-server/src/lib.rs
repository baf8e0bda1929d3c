use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use voxrelay_core::gateway::{serve, SynthesisGateway};
use voxrelay_core::settings::SettingsManager;
use voxrelay_core::synthesis::AzureSpeech;

/// Load settings, build the gateway and serve until ctrl-c
pub async fn run_server(settings_path: Option<PathBuf>, bind: Option<String>) -> Result<()> {
    let manager = match settings_path {
        Some(path) => SettingsManager::from_path(path)?,
        None => SettingsManager::new()?,
    };
    info!(path = ?manager.path(), "Loaded settings");
    let settings = manager.settings();

    let speech = AzureSpeech::new(settings.speech_config()?)?;
    let catalog = Arc::new(settings.catalog().context("Invalid voice catalog in settings")?);

    let default_language = catalog.normalize_language(&settings.default_language);
    if catalog.language(&default_language).is_none() {
        warn!(%default_language, "Default language is not in the catalog, the fallback voice will be used");
    }

    let gateway = SynthesisGateway::new(catalog, Arc::new(speech))
        .with_default_language(default_language)
        .with_markup_mode(settings.markup_mode());

    let bind = bind.unwrap_or(settings.server.bind);
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    serve(listener, Arc::new(gateway), shutdown_signal()).await?;
    info!("Synthesis gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = ?e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
