//! trackerd - background location-tracking service controller
//!
//! This is the binary entry point. It wires the platform shim, the
//! lifecycle controller, and the command bridge together, then serves
//! the machine protocol over stdin/stdout.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;

use trackd_core::prelude::*;
use trackd_service::{CommandBridge, NoopShim, PermissionGate, ServiceController, TrackerConfig};

mod server;

/// trackerd - background location-tracking service controller
#[derive(Parser, Debug)]
#[command(name = "trackd")]
#[command(about = "Background location-tracking service controller", long_about = None)]
struct Args {
    /// Directory holding .trackd/config.toml (defaults to the current directory)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Explicit config file path (overrides PATH lookup)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    trackd_core::logging::init()?;

    let config = match &args.config {
        Some(path) => TrackerConfig::load_file(path)?,
        None => {
            let dir = args
                .path
                .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
            TrackerConfig::load(&dir)?
        }
    };

    let shim = Arc::new(NoopShim::new());
    let (event_tx, event_rx) = mpsc::channel(32);

    let controller = Arc::new(
        ServiceController::new(
            Arc::clone(&shim),
            config.channel_config(),
            config.persistent_notification(),
        )
        .with_events(event_tx),
    );
    let gate = PermissionGate::new(shim);
    let bridge =
        CommandBridge::new(controller, gate).with_command_timeout(config.command_timeout());

    info!(
        "Serving commands (channel: {}, timeout: {:?})",
        config.channel.id,
        config.command_timeout()
    );

    server::run(bridge, event_rx, tokio::io::stdin(), tokio::io::stdout()).await?;

    info!("trackerd exiting");
    Ok(())
}
