use crate::core_network::error::FtpError;
use crate::core_network::ControlWriter;
use log::debug;
use tokio::io::AsyncWriteExt;

/// Sends a response to the client.
pub async fn send_response(writer: &ControlWriter, message: &[u8]) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer.write_all(message).await?;
    writer.flush().await?;
    debug!("Sent: {}", String::from_utf8_lossy(message).trim_end());
    Ok(())
}

/// Sends the reply matching a command-level error.
pub async fn send_error_response(writer: &ControlWriter, error: &FtpError) -> Result<(), std::io::Error> {
    send_response(writer, error.to_ftp_response().as_bytes()).await
}
