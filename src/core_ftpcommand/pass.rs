use crate::core_network::ControlWriter;
use crate::helpers::send_response;
use crate::session::Session;
use crate::Config;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the PASS FTP command. Passwords are not checked.
pub async fn handle_pass_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let peer = session.lock().await.peer_addr;
    info!("User logged in from {}", peer);

    send_response(&writer, b"230 User logged in\r\n").await
}
