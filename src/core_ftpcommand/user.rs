use crate::core_network::ControlWriter;
use crate::helpers::send_response;
use crate::session::Session;
use crate::Config;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the USER FTP command.
///
/// Any username is accepted; the client is asked for a password.
///
/// # Arguments
///
/// * `writer` - A shared, locked control writer for responses to the client.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - A shared, locked session containing the client's state.
/// * `username` - The username provided by the client.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_user_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    username: String,
) -> Result<(), std::io::Error> {
    let peer = session.lock().await.peer_addr;
    info!("Received USER command from {} with username: {}", peer, username);

    send_response(&writer, b"331 Username OK, need password\r\n").await
}
