//! `ecotiles serve` - run the tile server.

use std::path::PathBuf;

use clap::Args;
use ecotiles::app::{AppConfig, EcoTilesApp};
use ecotiles::logging::init_logging;
use tracing::{info, warn};

use super::load_config;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind)
    #[arg(long)]
    pub bind: Option<String>,

    /// Directory for log files (overrides logging.directory)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

pub async fn run(config_path: Option<PathBuf>, args: ServeArgs) -> Result<(), CliError> {
    let mut file = load_config(config_path.as_deref())?;
    if let Some(bind) = args.bind {
        file.server.bind = bind;
    }
    if let Some(dir) = args.log_dir {
        file.logging.directory = dir;
    }

    let _logging_guard =
        init_logging(&file.logging.directory, &file.logging.file).map_err(CliError::LoggingInit)?;

    let config = AppConfig::from_config_file(&file)?;
    let app = EcoTilesApp::start(config).await?;

    let result = app.serve(shutdown_signal()).await;
    app.shutdown().await;
    result?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
    }
}
