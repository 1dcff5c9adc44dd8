use crate::core_network::ControlWriter;
use crate::helpers::send_response;
use log::debug;

/// Handles the TYPE FTP command.
///
/// Every transfer is binary, so the requested type is only logged.
pub async fn handle_type_command(writer: ControlWriter, arg: String) -> Result<(), std::io::Error> {
    debug!("TYPE {} requested, transfers stay binary", arg.trim());
    send_response(&writer, b"200 Type set to I.\r\n").await
}
