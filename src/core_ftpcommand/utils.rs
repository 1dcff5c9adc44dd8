use crate::core_network::data_channel::DataChannel;
use crate::core_network::error::FtpError;
use crate::core_network::ControlWriter;
use crate::helpers::{send_error_response, send_response};
use crate::Config;
use log::{error, info, warn};
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// Opens the data connection for a transfer command.
///
/// Replies 425 when no PASV listener is open, otherwise sends `opening` (the
/// 150 reply) and waits for the client. Returns `None` when the command must
/// stop here; the reply has already been sent in that case.
pub async fn open_data_connection<'a>(
    writer: &ControlWriter,
    config: &Config,
    channel: &'a mut DataChannel,
    peer_addr: SocketAddr,
    opening: &[u8],
) -> Result<Option<&'a mut TcpStream>, std::io::Error> {
    if !channel.is_listening() {
        warn!("Transfer command from {} before PASV", peer_addr);
        send_error_response(writer, &FtpError::ProtocolPrecondition).await?;
        return Ok(None);
    }

    send_response(writer, opening).await?;

    match channel.accept(config.server.accept_timeout()).await {
        Ok(stream) => Ok(Some(stream)),
        Err(e) => {
            error!("Data connection for {} failed: {}", peer_addr, e);
            send_error_response(writer, &e).await?;
            Ok(None)
        }
    }
}

/// Closes the data channel, then reports the transfer outcome on the control channel.
pub async fn finish_transfer(
    writer: &ControlWriter,
    channel: &mut DataChannel,
    peer_addr: SocketAddr,
    what: &str,
    result: Result<u64, FtpError>,
) -> Result<(), std::io::Error> {
    channel.close().await;

    match result {
        Ok(bytes) => {
            info!("{} completed for {}: {} bytes", what, peer_addr, bytes);
            send_response(writer, b"226 Transfer complete\r\n").await
        }
        Err(e) => {
            error!("{} failed for {}: {}", what, peer_addr, e);
            send_error_response(writer, &e).await
        }
    }
}
