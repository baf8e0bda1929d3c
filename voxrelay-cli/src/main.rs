use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod formatter;
mod interactive_app;
mod state;

use crate::interactive_app::{InteractiveApp, LaunchOptions};

#[derive(Parser, Debug)]
#[command(name = "voxrelay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "voxrelay - type text, hear it spoken")]
struct Args {
    /// Settings file (defaults to ~/.voxrelay/settings.toml)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Gateway base URL, overriding client.gateway_url
    #[arg(long, value_name = "URL")]
    gateway_url: Option<String>,

    /// Starting language code or name, e.g. zh-CN or chinese
    #[arg(long)]
    language: Option<String>,

    /// Starting voice
    #[arg(long)]
    voice: Option<String>,

    /// Text to synthesize right away
    #[arg(long)]
    text: Option<String>,
}

fn main() -> Result<()> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let local = tokio::task::LocalSet::new();
        local.run_until(async_main()).await
    })
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    info!(
        "CLI startup: settings={:?}, gateway_url={:?}, language={:?}",
        args.settings, args.gateway_url, args.language
    );

    let options = LaunchOptions {
        settings_path: args.settings,
        gateway_url: args.gateway_url,
        language: args.language,
        voice: args.voice,
        text: args.text,
    };

    let mut app = InteractiveApp::new(options)?;
    app.run().await
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // Terminal output belongs to the prompt, traces go to a file
    let home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
    let trace_dir = home.join(".voxrelay").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("voxrelay.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
