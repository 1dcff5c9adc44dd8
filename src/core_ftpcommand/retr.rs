use crate::config::ServerConfig;
use crate::core_fs::{resolve_existing, PathLocks};
use crate::core_ftpcommand::utils::{finish_transfer, open_data_connection};
use crate::core_network::error::FtpError;
use crate::core_network::ControlWriter;
use crate::core_transfer::stream_download;
use crate::session::Session;
use crate::Config;
use log::info;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the RETR (Retrieve) FTP command.
///
/// This function sends a file from the server root to the client over the
/// passive data connection. The name must stay inside the root; anything else
/// is reported as a missing file.
///
/// # Arguments
///
/// * `writer` - A shared, locked control writer for responses to the client.
/// * `config` - A shared server configuration.
/// * `session` - A shared, locked session owning the passive channel.
/// * `arg` - The name of the file to retrieve.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_retr_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut guard = session.lock().await;
    let session = &mut *guard;
    let peer_addr = session.peer_addr;

    let Some(stream) = open_data_connection(
        &writer,
        &config,
        &mut session.data_channel,
        peer_addr,
        b"150 Opening data connection\r\n",
    )
    .await?
    else {
        return Ok(());
    };

    let result = send_file(stream, &session.root_dir, &session.path_locks, &arg, &config.server).await;
    finish_transfer(&writer, &mut session.data_channel, peer_addr, "RETR", result).await
}

async fn send_file(
    stream: &mut TcpStream,
    root: &Path,
    path_locks: &PathLocks,
    name: &str,
    server: &ServerConfig,
) -> Result<u64, FtpError> {
    let path = resolve_existing(root, name).await?;
    let _guard = path_locks.read(&path, server.accept_timeout()).await?;

    let mut file = File::open(&path)
        .await
        .map_err(|_| FtpError::FileNotFound(name.to_string()))?;
    info!("Sending file: {:?}", path);

    stream_download(&mut file, stream, server.download_buffer_size, server.idle_timeout()).await
}
