use crate::config::ServerConfig;
use crate::core_ftpcommand::utils::{finish_transfer, open_data_connection};
use crate::core_network::error::FtpError;
use crate::core_network::ControlWriter;
use crate::core_transfer::{build_listing, stream_download};
use crate::session::Session;
use crate::Config;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the LIST FTP command.
///
/// Sends one line per regular file of the root directory over the data
/// connection opened by the preceding PASV.
///
/// # Arguments
///
/// * `writer` - A shared, locked control writer for responses to the client.
/// * `config` - A shared server configuration.
/// * `session` - A shared, locked session owning the passive channel.
/// * `_arg` - Ignored; only the root directory is ever listed.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_list_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let mut guard = session.lock().await;
    let session = &mut *guard;
    let peer_addr = session.peer_addr;

    let Some(stream) = open_data_connection(
        &writer,
        &config,
        &mut session.data_channel,
        peer_addr,
        b"150 Opening ASCII mode data connection for file list\r\n",
    )
    .await?
    else {
        return Ok(());
    };

    let result = send_listing(stream, &session.root_dir, &config.server).await;
    finish_transfer(&writer, &mut session.data_channel, peer_addr, "LIST", result).await
}

async fn send_listing(
    stream: &mut TcpStream,
    root: &Path,
    server: &ServerConfig,
) -> Result<u64, FtpError> {
    let listing = build_listing(root)
        .await
        .map_err(FtpError::LocalProcessing)?;

    stream_download(
        &mut listing.as_bytes(),
        stream,
        server.download_buffer_size,
        server.idle_timeout(),
    )
    .await
}
