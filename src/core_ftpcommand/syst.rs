use crate::core_network::ControlWriter;
use crate::helpers::send_response;
use log::debug;

/// Handles the SYST FTP command.
///
/// The server always reports a UNIX system so clients parse LIST output as
/// `ls -l` lines.
pub async fn handle_syst_command(writer: ControlWriter) -> Result<(), std::io::Error> {
    debug!("Reporting UNIX system type");
    send_response(&writer, b"215 UNIX Type: L8\r\n").await
}
