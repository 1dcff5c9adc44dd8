// src/constants.rs

use std::net::Ipv4Addr;

/// Longest control line accepted, terminator included.
pub const MAX_COMMAND_LENGTH: usize = 1024;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/simpleftpd.conf";

pub const DEFAULT_LISTEN_PORT: u16 = 2005;
pub const DEFAULT_ROOT_DIR: &str = "share";
pub const DEFAULT_DATA_ACCEPT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DATA_IDLE_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 256 * 1024;
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 128 * 1024;

pub const FALLBACK_PASV_ADDRESS: Ipv4Addr = Ipv4Addr::LOCALHOST;

// Listing placeholders, clients only rely on size and name.
pub const LISTING_PERMISSIONS: &str = "-rw-r--r--";
pub const LISTING_OWNER: &str = "user";
pub const LISTING_GROUP: &str = "group";
pub const LISTING_TIMESTAMP: &str = "Jul 19 12:00";
