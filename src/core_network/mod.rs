pub mod data_channel;
pub mod error;
pub mod local_ip;
pub mod network;
pub mod pasv;

#[cfg(test)]
mod test_session;

use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Write half of a control connection, shared by the command handlers.
pub type ControlWriter = Arc<Mutex<OwnedWriteHalf>>;
