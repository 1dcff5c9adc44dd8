use crate::core_network::error::FtpError;
use crate::core_network::pasv::PassiveListener;
use log::{debug, info};
use std::ops::RangeInclusive;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Passive data channel of one session.
///
/// Leaving a state closes whatever that state owned, so a session never holds
/// more than one listener or one data connection.
#[derive(Debug, Default)]
pub enum DataChannel {
    #[default]
    Idle,
    Listening(PassiveListener),
    Connected(TcpStream),
}

impl DataChannel {
    pub fn is_listening(&self) -> bool {
        matches!(self, DataChannel::Listening(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DataChannel::Idle)
    }

    /// Replaces the current channel with a fresh passive listener and returns its port.
    ///
    /// The previous listener or connection is released before binding, so on
    /// failure the channel is left idle.
    pub async fn open_passive(
        &mut self,
        range: Option<RangeInclusive<u16>>,
    ) -> Result<u16, FtpError> {
        if !self.is_idle() {
            info!("Releasing previous passive channel before PASV");
            self.close().await;
        }

        let listener = PassiveListener::open(range).await?;
        let port = listener.port();
        *self = DataChannel::Listening(listener);
        Ok(port)
    }

    /// Accepts the single data connection for a transfer command.
    ///
    /// Fails with `ProtocolPrecondition` when no listener is open. The listener
    /// is closed in every case.
    pub async fn accept(&mut self, wait: Duration) -> Result<&mut TcpStream, FtpError> {
        let listener = match std::mem::take(self) {
            DataChannel::Listening(listener) => listener,
            _ => return Err(FtpError::ProtocolPrecondition),
        };

        *self = DataChannel::Connected(listener.accept_once(wait).await?);
        let DataChannel::Connected(stream) = self else {
            unreachable!("data channel was just set to Connected");
        };
        Ok(stream)
    }

    /// Shuts down and drops whatever is open, leaving the channel idle.
    pub async fn close(&mut self) {
        match std::mem::take(self) {
            DataChannel::Connected(mut stream) => {
                if let Err(e) = stream.shutdown().await {
                    debug!("Data connection shutdown failed: {}", e);
                }
            }
            DataChannel::Listening(listener) => {
                debug!("Closing passive listener on port {}", listener.port());
            }
            DataChannel::Idle => {}
        }
    }
}
