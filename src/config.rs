use crate::constants::{
    DEFAULT_DATA_ACCEPT_TIMEOUT_SECS, DEFAULT_DATA_IDLE_TIMEOUT_SECS, DEFAULT_DOWNLOAD_BUFFER_SIZE, DEFAULT_LISTEN_PORT,
    DEFAULT_ROOT_DIR, DEFAULT_UPLOAD_BUFFER_SIZE,
};
use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    pub root_dir: PathBuf,
    pub pasv_address: Option<String>, // Public IPv4 advertised in 227 replies
    pub pasv_port_min: Option<u16>,
    pub pasv_port_max: Option<u16>,
    pub data_accept_timeout: u64, // Seconds to wait for the client on a PASV port, or for a busy file
    pub data_idle_timeout: u64,   // Seconds a data connection may stall mid-transfer
    pub upload_buffer_size: usize,
    pub download_buffer_size: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("0.0.0.0"),
            listen_port: DEFAULT_LISTEN_PORT,
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            pasv_address: None,
            pasv_port_min: None,
            pasv_port_max: None,
            data_accept_timeout: DEFAULT_DATA_ACCEPT_TIMEOUT_SECS,
            data_idle_timeout: DEFAULT_DATA_IDLE_TIMEOUT_SECS,
            upload_buffer_size: DEFAULT_UPLOAD_BUFFER_SIZE,
            download_buffer_size: DEFAULT_DOWNLOAD_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    /// The configured passive port range, if any.
    pub fn pasv_port_range(&self) -> Option<RangeInclusive<u16>> {
        match (self.pasv_port_min, self.pasv_port_max) {
            (Some(min), Some(max)) => Some(min..=max),
            _ => None,
        }
    }

    /// The configured passive address, already checked by `Config::validate`.
    pub fn pasv_ipv4(&self) -> Option<Ipv4Addr> {
        self.pasv_address.as_deref().and_then(|a| a.parse().ok())
    }

    pub fn accept_timeout(&self) -> Duration {
        Duration::from_secs(self.data_accept_timeout)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.data_idle_timeout)
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Invalid configuration file: {}", path))
    }

    /// Rejects settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        let server = &self.server;

        match (server.pasv_port_min, server.pasv_port_max) {
            (Some(min), Some(max)) if min > max => {
                bail!("pasv_port_min ({}) is greater than pasv_port_max ({})", min, max)
            }
            (Some(_), None) | (None, Some(_)) => {
                bail!("pasv_port_min and pasv_port_max must be set together")
            }
            _ => {}
        }

        if let Some(address) = &server.pasv_address {
            address
                .parse::<Ipv4Addr>()
                .with_context(|| format!("pasv_address is not an IPv4 address: {}", address))?;
        }

        if server.data_accept_timeout == 0 {
            bail!("data_accept_timeout must be at least one second");
        }
        if server.data_idle_timeout == 0 {
            bail!("data_idle_timeout must be at least one second");
        }
        if server.upload_buffer_size == 0 || server.download_buffer_size == 0 {
            bail!("transfer buffer sizes must be non-zero");
        }

        Ok(())
    }
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    let server = &config.server;
    info!("  Listen Address: {}:{}", server.listen_address, server.listen_port);
    info!("  Root Directory: {}", server.root_dir.display());
    info!(
        "  PASV Address: {}",
        server.pasv_address.as_deref().unwrap_or("(discovered)")
    );
    match server.pasv_port_range() {
        Some(range) => info!("  PASV Ports: {}-{}", range.start(), range.end()),
        None => info!("  PASV Ports: (chosen by the OS)"),
    }
    info!("  Data Accept Timeout: {}s", server.data_accept_timeout);
    info!("  Data Idle Timeout: {}s", server.data_idle_timeout);
    info!("  Upload Buffer Size: {} KB", server.upload_buffer_size / 1024);
    info!("  Download Buffer Size: {} KB", server.download_buffer_size / 1024);
}
