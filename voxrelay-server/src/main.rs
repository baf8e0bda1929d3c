use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use voxrelay_server::run_server;

#[derive(Parser, Debug)]
#[command(name = "voxrelay-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "voxrelay - text-to-speech gateway for the Azure speech API")]
struct Args {
    /// Settings file (defaults to ~/.voxrelay/settings.toml)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Address to listen on, overriding server.bind
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_server(args.settings, args.bind))
}
