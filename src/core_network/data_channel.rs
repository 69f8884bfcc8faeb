use crate::core_fs::{ChunkSource, FsError, LocalFileSystem, VirtualPath};
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddrV4;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Outbound (active mode) data connection for a single transfer.
pub struct DataChannel {
    stream: TcpStream,
    endpoint: SocketAddrV4,
    buffer: Vec<u8>,
}

impl DataChannel {
    /// Connects to the client's endpoint, giving up after `connect_timeout`.
    pub async fn connect(
        endpoint: SocketAddrV4,
        buffer_size: usize,
        connect_timeout: Duration,
    ) -> io::Result<Self> {
        let stream = match timeout(connect_timeout, TcpStream::connect(endpoint)).await {
            Ok(stream) => stream?,
            Err(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no answer from {} within {:?}", endpoint, connect_timeout),
                ))
            }
        };
        info!("Data connection established with {}", endpoint);
        Ok(Self {
            stream,
            endpoint,
            buffer: vec![0; buffer_size.max(1)],
        })
    }

    /// Streams every chunk of `source` to the peer.
    ///
    /// Local read failures come back as [`FsError::Io`], peer failures as
    /// [`FsError::Interrupted`].
    pub async fn send_all<S: ChunkSource>(&mut self, source: &mut S) -> Result<u64, FsError> {
        let mut sent = 0u64;
        while let Some(chunk) = source.next_chunk().await? {
            self.stream
                .write_all(&chunk)
                .await
                .map_err(FsError::Interrupted)?;
            sent += chunk.len() as u64;
            debug!("Sent {} bytes to {}", chunk.len(), self.endpoint);
        }
        Ok(sent)
    }

    /// Closes the connection, which tells the peer the stream has ended.
    pub async fn close(mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

/// Reads until the peer closes its side.
impl ChunkSource for DataChannel {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let n = self.stream.read(&mut self.buffer).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(self.buffer[..n].to_vec()))
    }
}

// Once the data phase has started, a local I/O failure is a 451 rather than
// the usual 550.
fn transfer_failure_reply(err: &FsError) -> (u16, &'static str) {
    match err {
        FsError::Io(_) => (451, "Requested action aborted. Local error in processing."),
        other => other.to_ftp_response(),
    }
}

/// Consumes the session's pending endpoint, answering 425 when there is none.
pub async fn take_endpoint(
    writer: &ControlWriter,
    session: &mut Session,
) -> Result<Option<SocketAddrV4>, io::Error> {
    match session.take_data_endpoint() {
        Some(endpoint) => Ok(Some(endpoint)),
        None => {
            warn!("Transfer requested without a prior PORT command");
            send_reply(writer, 425, "Use PORT first.").await?;
            Ok(None)
        }
    }
}

async fn open_channel(
    writer: &ControlWriter,
    endpoint: SocketAddrV4,
    buffer_size: usize,
    connect_timeout: Duration,
) -> Result<Option<DataChannel>, io::Error> {
    send_reply(writer, 150, "File status okay; about to open data connection.").await?;
    match DataChannel::connect(endpoint, buffer_size, connect_timeout).await {
        Ok(channel) => Ok(Some(channel)),
        Err(e) => {
            error!("Failed to connect to {}: {}", endpoint, e);
            send_reply(writer, 425, "Can't open data connection.").await?;
            Ok(None)
        }
    }
}

async fn finish(writer: &ControlWriter, channel: DataChannel) -> Result<(), io::Error> {
    let endpoint = channel.endpoint;
    if let Err(e) = channel.close().await {
        warn!("Error shutting down data connection to {}: {}", endpoint, e);
    }
    send_reply(writer, 226, "Closing data connection. Transfer complete.").await
}

/// Download direction: 150, connect, stream `source`, close, 226.
///
/// Returns `Err` only when the control connection itself fails.
pub async fn send_data<S: ChunkSource>(
    writer: &ControlWriter,
    endpoint: SocketAddrV4,
    source: &mut S,
    buffer_size: usize,
    connect_timeout: Duration,
) -> Result<(), io::Error> {
    let Some(mut channel) = open_channel(writer, endpoint, buffer_size, connect_timeout).await?
    else {
        return Ok(());
    };
    match channel.send_all(source).await {
        Ok(sent) => {
            info!("Sent {} bytes to {}", sent, endpoint);
            finish(writer, channel).await
        }
        Err(e) => {
            error!("Transfer to {} failed: {}", endpoint, e);
            let (code, text) = transfer_failure_reply(&e);
            send_reply(writer, code, text).await
        }
    }
}

/// Upload direction: 150, connect, write everything the peer sends to
/// `path`, close, 226.
pub async fn receive_data(
    writer: &ControlWriter,
    endpoint: SocketAddrV4,
    fs: &LocalFileSystem,
    path: &VirtualPath,
    buffer_size: usize,
    connect_timeout: Duration,
) -> Result<(), io::Error> {
    let Some(mut channel) = open_channel(writer, endpoint, buffer_size, connect_timeout).await?
    else {
        return Ok(());
    };
    match fs.write_bytes(path, &mut channel).await {
        Ok(received) => {
            info!("Stored {} bytes from {} at {}", received, endpoint, path);
            finish(writer, channel).await
        }
        Err(e) => {
            error!("Upload of {} from {} failed: {}", path, endpoint, e);
            let (code, text) = transfer_failure_reply(&e);
            send_reply(writer, code, text).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tokio::net::tcp::OwnedWriteHalf;
    use tokio::net::TcpListener;

    const WAIT: Duration = Duration::from_secs(5);

    struct Chunks(VecDeque<Vec<u8>>);

    impl ChunkSource for Chunks {
        async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
            Ok(self.0.pop_front())
        }
    }

    async fn local_listener() -> (TcpListener, SocketAddrV4) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, SocketAddrV4::new(std::net::Ipv4Addr::LOCALHOST, port))
    }

    async fn control_pair() -> (TcpStream, OwnedWriteHalf) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).await.unwrap();
        let (server, _) = listener.accept().await.unwrap();
        let (_read_half, write_half) = server.into_split();
        (client, write_half)
    }

    #[tokio::test]
    async fn test_send_all_then_close_signals_end_of_stream() {
        let (listener, endpoint) = local_listener().await;
        let reader = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let mut channel = DataChannel::connect(endpoint, 16, WAIT).await.unwrap();
        let mut source = Chunks(VecDeque::from(vec![b"hello ".to_vec(), b"world".to_vec()]));
        assert_eq!(channel.send_all(&mut source).await.unwrap(), 11);
        channel.close().await.unwrap();

        assert_eq!(reader.await.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn test_channel_reads_until_peer_closes() {
        let (listener, endpoint) = local_listener().await;
        let writer = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(&[7u8; 100]).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let mut channel = DataChannel::connect(endpoint, 32, WAIT).await.unwrap();
        let mut total = Vec::new();
        while let Some(chunk) = channel.next_chunk().await.unwrap() {
            assert!(chunk.len() <= 32);
            total.extend(chunk);
        }
        writer.await.unwrap();
        assert_eq!(total, vec![7u8; 100]);
    }

    #[test]
    fn test_transfer_failure_reply() {
        let disk = FsError::Io(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(transfer_failure_reply(&disk).0, 451);
        let peer = FsError::Interrupted(io::Error::from(io::ErrorKind::ConnectionReset));
        assert_eq!(transfer_failure_reply(&peer).0, 426);
        assert_eq!(transfer_failure_reply(&FsError::NotFound("/f".into())).0, 550);
    }

    #[tokio::test]
    async fn test_connect_fails_when_nobody_listens() {
        let (listener, endpoint) = local_listener().await;
        drop(listener);
        assert!(DataChannel::connect(endpoint, 16, WAIT).await.is_err());
    }

    #[tokio::test]
    async fn test_connect_gives_up_after_timeout() {
        // 10.255.255.1 is unrouted on test hosts, so the SYN goes unanswered.
        let endpoint = SocketAddrV4::new(std::net::Ipv4Addr::new(10, 255, 255, 1), 21);
        let started = tokio::time::Instant::now();
        assert!(DataChannel::connect(endpoint, 16, Duration::from_millis(200))
            .await
            .is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_open_channel_reports_425_on_timeout() {
        let (mut client, server) = control_pair().await;
        let writer: ControlWriter = std::sync::Arc::new(tokio::sync::Mutex::new(server));
        let endpoint = SocketAddrV4::new(std::net::Ipv4Addr::new(10, 255, 255, 1), 21);
        let opened = open_channel(&writer, endpoint, 16, Duration::ZERO).await.unwrap();
        assert!(opened.is_none());
        drop(writer);

        let mut replies = String::new();
        client.read_to_string(&mut replies).await.unwrap();
        assert_eq!(
            replies,
            "150 File status okay; about to open data connection.\r\n\
             425 Can't open data connection.\r\n"
        );
    }
}
