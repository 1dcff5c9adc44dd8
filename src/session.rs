use crate::core_fs::PathLocks;
use crate::core_network::data_channel::DataChannel;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

/// State of one control connection.
///
/// A session owns its data channel exclusively; dropping it closes any
/// listener or data connection still open.
#[derive(Debug)]
pub struct Session {
    pub peer_addr: SocketAddr,
    pub root_dir: PathBuf,      // Canonical directory every file name resolves under
    pub pasv_address: Ipv4Addr, // Address advertised in 227 replies
    pub data_channel: DataChannel,
    pub path_locks: Arc<PathLocks>, // Shared with every other session
}

impl Session {
    pub fn new(
        peer_addr: SocketAddr,
        root_dir: PathBuf,
        pasv_address: Ipv4Addr,
        path_locks: Arc<PathLocks>,
    ) -> Self {
        Self {
            peer_addr,
            root_dir,
            pasv_address,
            data_channel: DataChannel::default(),
            path_locks,
        }
    }
}
