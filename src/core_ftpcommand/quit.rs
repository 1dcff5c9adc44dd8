use crate::core_network::ControlWriter;
use crate::helpers::send_response;
use crate::session::Session;
use crate::Config;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the QUIT FTP command.
///
/// This function sends the closing reply; the control loop ends the session
/// right after it.
///
/// # Arguments
///
/// * `writer` - A shared, locked control writer for responses to the client.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - The session being closed.
/// * `_arg` - The argument for the QUIT command (not used in this command).
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_quit_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let peer = session.lock().await.peer_addr;
    info!("Received QUIT command from {}. Closing connection.", peer);

    if let Err(e) = send_response(&writer, b"221 Goodbye\r\n").await {
        error!("Failed to send QUIT response: {}", e);
        return Err(e);
    }

    Ok(())
}
