use crate::core_network::ControlWriter;
use crate::helpers::send_response;
use log::debug;

/// Handles CWD and CDUP. The working directory is always the root, so both
/// are acknowledged without changing anything.
pub async fn handle_cwd_command(writer: ControlWriter, arg: String) -> Result<(), std::io::Error> {
    debug!("Directory change to {:?} acknowledged", arg.trim());
    send_response(&writer, b"250 Directory change OK\r\n").await
}
