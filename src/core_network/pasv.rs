use crate::core_network::error::FtpError;
use crate::core_network::ControlWriter;
use crate::helpers::{send_error_response, send_response};
use crate::session::Session;
use crate::Config;
use log::{debug, error, info, trace};
use rand::Rng;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::Mutex;

/// Opens a fresh passive listener and sends the 227 reply to the client.
///
/// Any listener left over from a previous PASV is closed first.
pub async fn handle_pasv_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;

    match session
        .data_channel
        .open_passive(config.server.pasv_port_range())
        .await
    {
        Ok(port) => {
            let pasv_response = pasv_response(session.pasv_address, port);
            send_response(&writer, pasv_response.as_bytes()).await?;
            info!(
                "PASV listener for {} set up on {}:{}",
                session.peer_addr, session.pasv_address, port
            );
        }
        Err(e) => {
            error!("Failed to open passive listener for {}: {}", session.peer_addr, e);
            send_error_response(&writer, &e).await?;
        }
    }

    Ok(())
}

/// A single-use passive listener, bound on the wildcard address.
#[derive(Debug)]
pub struct PassiveListener {
    listener: TcpListener,
    port: u16,
}

impl PassiveListener {
    /// Opens a passive listener with a backlog of one.
    ///
    /// Without a range the OS picks the port. With a range, ports are tried from a
    /// random offset and the first free one wins.
    pub async fn open(range: Option<RangeInclusive<u16>>) -> Result<Self, FtpError> {
        let listener = match range {
            None => bind_listener(0).map_err(FtpError::ChannelOpenFailure)?,
            Some(range) => bind_in_range(range)?,
        };

        let port = listener
            .local_addr()
            .map_err(FtpError::ChannelOpenFailure)?
            .port();
        debug!("Passive mode listening on port {}", port);

        Ok(Self { listener, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for exactly one data connection, giving up after `wait`.
    ///
    /// The listener is consumed, so it is closed whatever the outcome.
    pub async fn accept_once(self, wait: Duration) -> Result<TcpStream, FtpError> {
        match tokio::time::timeout(wait, self.listener.accept()).await {
            Ok(Ok((stream, addr))) => {
                debug!("Accepted data connection from: {} on port {}", addr, self.port);
                Ok(stream)
            }
            Ok(Err(e)) => Err(FtpError::ChannelAcceptFailure(e)),
            Err(_) => Err(FtpError::AcceptTimeout(wait)),
        }
    }
}

fn bind_listener(port: u16) -> std::io::Result<TcpListener> {
    let socket = TcpSocket::new_v4()?;
    socket.set_reuseaddr(true)?;
    socket.bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))?;
    socket.listen(1)
}

fn bind_in_range(range: RangeInclusive<u16>) -> Result<TcpListener, FtpError> {
    let (min, max) = (*range.start(), *range.end());
    let span = u32::from(max - min) + 1;
    let offset = rand::thread_rng().gen_range(0..span);

    for step in 0..span {
        let port = min + ((offset + step) % span) as u16;
        match bind_listener(port) {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                trace!("Passive port {} in use, trying the next one", port);
            }
            Err(e) => return Err(FtpError::ChannelOpenFailure(e)),
        }
    }

    Err(FtpError::NoFreePassivePort(min, max))
}

/// Formats the 227 reply: four address octets, then the port as `P / 256, P % 256`.
pub fn pasv_response(ip: Ipv4Addr, port: u16) -> String {
    let [a, b, c, d] = ip.octets();
    format!(
        "227 Entering Passive Mode ({},{},{},{},{},{}).\r\n",
        a,
        b,
        c,
        d,
        port / 256,
        port % 256
    )
}
