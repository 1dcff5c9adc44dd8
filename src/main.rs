mod config;
mod constants;
mod core_cli;
mod core_fs;
mod core_ftpcommand;
mod core_log;
mod core_network;
mod core_transfer;
mod helpers;
mod server;
mod session;

pub use config::Config;

use crate::constants::DEFAULT_CONFIG_PATH;
use crate::core_cli::Cli;
use crate::core_log::logger::init_logger;
use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    init_logger(args.verbose);

    let mut config = load_config(&args.config)?;

    // Command-line overrides
    if let Some(root) = args.root {
        config.server.root_dir = root;
    }
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }
    config.validate()?;

    // Run the FTP server
    server::run(config).await
}

/// Loads the configuration named on the command line, or the default file.
///
/// A missing default file means built-in defaults; a missing explicit file is an error.
fn load_config(cli_path: &str) -> Result<Config> {
    if !cli_path.is_empty() {
        return Config::load_from_file(cli_path);
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        Config::load_from_file(DEFAULT_CONFIG_PATH)
    } else {
        info!(
            "No configuration file at {}, using built-in defaults",
            DEFAULT_CONFIG_PATH
        );
        Ok(Config::default())
    }
}
