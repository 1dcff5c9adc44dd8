// src/core_ftpcommand/pwd.rs
use crate::core_network::ControlWriter;
use crate::helpers::send_response;

// Directory navigation is not tracked, clients always sit at the root.
pub async fn handle_pwd_command(writer: ControlWriter) -> std::io::Result<()> {
    send_response(&writer, b"257 \"/\" is the current directory\r\n").await
}
