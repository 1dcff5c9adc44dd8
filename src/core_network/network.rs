use crate::constants::MAX_COMMAND_LENGTH;
use crate::core_fs::PathLocks;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::initialize_command_handlers;
use crate::core_network::error::FtpError;
use crate::core_network::local_ip::resolve_pasv_address;
use crate::core_network::ControlWriter;
use crate::helpers::{send_error_response, send_response};
use crate::session::Session;
use crate::Config;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

const GREETING: &[u8] = b"220 Simple FTP Ready\r\n";

/// Binds the control port and serves clients until Ctrl-C.
pub async fn start_server(config: Arc<Config>, root_dir: PathBuf) -> Result<()> {
    let address = format!(
        "{}:{}",
        config.server.listen_address, config.server.listen_port
    );
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind control port {}", address))?;
    info!("Server listening on {}", address);

    tokio::select! {
        result = serve(listener, config, root_dir) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested, no longer accepting connections");
            Ok(())
        }
    }
}

/// Accept loop. Each control connection runs in its own task.
pub async fn serve(listener: TcpListener, config: Arc<Config>, root_dir: PathBuf) -> Result<()> {
    let path_locks = Arc::new(PathLocks::new());

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept control connection: {}", e);
                continue;
            }
        };
        info!("New connection from {:?}", addr);

        let config = Arc::clone(&config);
        let root_dir = root_dir.clone();
        let path_locks = Arc::clone(&path_locks);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, addr, config, root_dir, path_locks).await {
                error!("Connection error: {:?}", e);
            }
            info!("Connection closed for {:?}", addr);
        });
    }
}

pub async fn handle_connection(
    socket: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<Config>,
    root_dir: PathBuf,
    path_locks: Arc<PathLocks>,
) -> Result<()> {
    let pasv_address = resolve_pasv_address(&config.server);
    let session = Arc::new(Mutex::new(Session::new(
        peer_addr,
        root_dir,
        pasv_address,
        path_locks,
    )));

    let (read_half, write_half) = socket.into_split();
    let writer: ControlWriter = Arc::new(Mutex::new(write_half));
    let mut reader = BufReader::new(read_half);

    let result = run_session(&mut reader, &writer, peer_addr, &config, &session).await;

    session.lock().await.data_channel.close().await;
    if let Err(e) = writer.lock().await.shutdown().await {
        debug!("Control connection shutdown failed for {}: {}", peer_addr, e);
    }

    result
}

async fn run_session<R>(
    reader: &mut R,
    writer: &ControlWriter,
    peer_addr: SocketAddr,
    config: &Arc<Config>,
    session: &Arc<Mutex<Session>>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    send_response(writer, GREETING).await?;

    let handlers = initialize_command_handlers();

    loop {
        let line = match read_command_line(reader).await? {
            CommandLine::Closed => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            CommandLine::TooLong => {
                warn!("Discarded a command line longer than {} bytes", MAX_COMMAND_LENGTH);
                send_response(writer, b"500 Command line too long.\r\n").await?;
                continue;
            }
            CommandLine::Line(line) => line,
        };

        let Some((command, arg)) = FtpCommand::parse(&line) else {
            let unknown = line.trim_end().to_string();
            info!("Received unsupported command from {}: {}", peer_addr, unknown);
            send_error_response(writer, &FtpError::UnsupportedCommand(unknown)).await?;
            continue;
        };

        if command == FtpCommand::PASS {
            info!("Received command from {}: PASS ****", peer_addr);
        } else {
            info!("Received command from {}: {}", peer_addr, line.trim_end());
        }

        if let Some(handler) = handlers.get(&command) {
            if let Err(e) = handler(
                Arc::clone(writer),
                Arc::clone(config),
                Arc::clone(session),
                arg,
            )
            .await
            {
                error!("Error handling command {:?} from {}: {:?}", command, peer_addr, e);
                break;
            }
        }

        if command == FtpCommand::QUIT {
            break;
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum CommandLine {
    Line(String),
    TooLong,
    Closed,
}

/// Reads one control line of at most `MAX_COMMAND_LENGTH` bytes.
///
/// A longer line is drained up to its newline and reported as `TooLong`.
/// Invalid UTF-8 is replaced rather than rejected.
async fn read_command_line<R>(reader: &mut R) -> std::io::Result<CommandLine>
where
    R: AsyncBufRead + Unpin,
{
    let limit = MAX_COMMAND_LENGTH as u64;
    let mut buf = Vec::new();

    let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(CommandLine::Closed);
    }

    if !buf.ends_with(b"\n") && buf.len() >= MAX_COMMAND_LENGTH {
        loop {
            let mut rest = Vec::new();
            let n = (&mut *reader).take(limit).read_until(b'\n', &mut rest).await?;
            if n == 0 || rest.ends_with(b"\n") {
                break;
            }
        }
        return Ok(CommandLine::TooLong);
    }

    Ok(CommandLine::Line(String::from_utf8_lossy(&buf).into_owned()))
}
