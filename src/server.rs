use crate::config::log_config;
use crate::core_network::network;
use crate::Config;
use anyhow::{Context, Result};
use log::{error, info};
use std::sync::Arc;

/// Runs the FTP server with the provided configuration.
///
/// The root directory is canonicalized once here; every session resolves
/// client file names against that path.
///
/// # Arguments
///
/// * `config` - The validated server configuration.
///
/// # Returns
///
/// Result<(), anyhow::Error> indicating the success or failure of the operation.
pub async fn run(config: Config) -> Result<()> {
    let root_dir = config.server.root_dir.canonicalize().with_context(|| {
        format!(
            "Root directory is not accessible: {}",
            config.server.root_dir.display()
        )
    })?;
    if !root_dir.is_dir() {
        anyhow::bail!("Root directory is not a directory: {}", root_dir.display());
    }

    info!("Starting server with config:");
    log_config(&config);
    info!("Serving files from {}", root_dir.display());

    match network::start_server(Arc::new(config), root_dir).await {
        Ok(_) => info!("Server stopped."),
        Err(e) => {
            error!("Server failed: {:#}", e);
            return Err(e);
        }
    }

    Ok(())
}
