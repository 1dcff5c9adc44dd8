use crate::core_network::error::FtpError;
use std::future::Future;
use std::io::{Error, ErrorKind};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

/// Runs one data-socket operation, giving up when the peer stalls for `idle`.
async fn on_data_socket<T, F>(idle: Duration, op: F) -> Result<T, FtpError>
where
    F: Future<Output = std::io::Result<T>>,
{
    match timeout(idle, op).await {
        Ok(result) => result.map_err(FtpError::DataTransferAborted),
        Err(_) => Err(FtpError::DataTransferAborted(Error::new(
            ErrorKind::TimedOut,
            format!("data connection idle for {:?}", idle),
        ))),
    }
}

/// Sends a local file over the data connection, chunk by chunk.
///
/// Each chunk is written to completion. Returns the number of bytes sent.
pub async fn stream_download<R, W>(
    file: &mut R,
    data_stream: &mut W,
    buffer_size: usize,
    idle: Duration,
) -> Result<u64, FtpError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0; buffer_size];
    let mut total = 0u64;

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .await
            .map_err(FtpError::LocalProcessing)?;
        if bytes_read == 0 {
            break;
        }
        on_data_socket(idle, data_stream.write_all(&buffer[..bytes_read])).await?;
        total += bytes_read as u64;
    }

    on_data_socket(idle, data_stream.flush()).await?;
    Ok(total)
}

/// Receives an upload until the client closes the data connection.
///
/// Returns the number of bytes written to `file`.
pub async fn stream_upload<R, W>(
    data_stream: &mut R,
    file: &mut W,
    buffer_size: usize,
    idle: Duration,
) -> Result<u64, FtpError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0; buffer_size];
    let mut total = 0u64;

    loop {
        let bytes_read = on_data_socket(idle, data_stream.read(&mut buffer)).await?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .await
            .map_err(FtpError::LocalProcessing)?;
        total += bytes_read as u64;
    }

    file.flush().await.map_err(FtpError::LocalProcessing)?;
    Ok(total)
}
