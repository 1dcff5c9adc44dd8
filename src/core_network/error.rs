// Errors raised while serving one FTP command
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FtpError {
    #[error("Failed to open passive listener: {0}")]
    ChannelOpenFailure(#[source] std::io::Error),

    #[error("No free passive port in {0}-{1}")]
    NoFreePassivePort(u16, u16),

    #[error("Failed to accept data connection: {0}")]
    ChannelAcceptFailure(#[source] std::io::Error),

    #[error("No data connection within {0:?}")]
    AcceptTimeout(Duration),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Could not create file {0}: {1}")]
    FileCreateFailure(String, #[source] std::io::Error),

    #[error("File {0} stayed busy for {1:?}")]
    FileBusy(String, Duration),

    #[error("Transfer command issued before PASV")]
    ProtocolPrecondition,

    #[error("Unsupported command: {0}")]
    UnsupportedCommand(String),

    #[error("Data connection failed during transfer: {0}")]
    DataTransferAborted(#[source] std::io::Error),

    #[error("Local I/O failure: {0}")]
    LocalProcessing(#[source] std::io::Error),
}

impl FtpError {
    /// The control reply sent to the client for this error, CRLF included.
    pub fn to_ftp_response(&self) -> &'static str {
        match self {
            FtpError::ChannelOpenFailure(_)
            | FtpError::NoFreePassivePort(..)
            | FtpError::ChannelAcceptFailure(_)
            | FtpError::AcceptTimeout(_) => "425 Can't open data connection\r\n",
            FtpError::ProtocolPrecondition => "425 Use PASV first.\r\n",
            FtpError::FileNotFound(_) => "550 File not found\r\n",
            FtpError::FileCreateFailure(..) => "550 Could not create file\r\n",
            FtpError::FileBusy(..) => "450 Requested file action not taken.\r\n",
            FtpError::UnsupportedCommand(_) => "502 Command not implemented\r\n",
            FtpError::DataTransferAborted(_) => "426 Connection closed; transfer aborted.\r\n",
            FtpError::LocalProcessing(_) => {
                "451 Requested action aborted. Local error in processing.\r\n"
            }
        }
    }
}
