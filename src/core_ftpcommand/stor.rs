use crate::config::ServerConfig;
use crate::core_fs::{resolve_for_create, PathLocks};
use crate::core_ftpcommand::utils::{finish_transfer, open_data_connection};
use crate::core_network::error::FtpError;
use crate::core_network::ControlWriter;
use crate::core_transfer::stream_upload;
use crate::session::Session;
use crate::Config;
use log::info;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the STOR (Store File) FTP command.
///
/// This function stores the bytes the client sends on the data connection
/// into a file of the server root, creating or truncating it. The upload ends
/// when the client closes the data connection.
///
/// # Arguments
///
/// * `writer` - A shared, locked control writer for responses to the client.
/// * `config` - A shared server configuration.
/// * `session` - A shared, locked session owning the passive channel.
/// * `arg` - The name of the file to be stored.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_stor_command(
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

    let result =
        receive_file(stream, &session.root_dir, &session.path_locks, &arg, &config.server).await;
    finish_transfer(&writer, &mut session.data_channel, peer_addr, "STOR", result).await
}

async fn receive_file(
    stream: &mut TcpStream,
    root: &Path,
    path_locks: &PathLocks,
    name: &str,
    server: &ServerConfig,
) -> Result<u64, FtpError> {
    let path = resolve_for_create(root, name).await?;
    let _guard = path_locks.write(&path, server.accept_timeout()).await?;

    let mut file = File::create(&path)
        .await
        .map_err(|e| FtpError::FileCreateFailure(name.to_string(), e))?;
    info!("Receiving file: {:?}", path);

    stream_upload(stream, &mut file, server.upload_buffer_size, server.idle_timeout()).await
}
