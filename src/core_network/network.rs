use crate::config::Config;
use crate::core_fs::LocalFileSystem;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{handle_unknown_command, initialize_command_handlers};
use crate::helpers::{send_reply, split_command, ControlWriter};
use crate::session::Session;
use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::time::timeout;

/// Accepts control connections forever, one task per client.
pub async fn start_server(
    listener: TcpListener,
    config: Arc<Config>,
    fs: Arc<LocalFileSystem>,
) -> Result<()> {
    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("New connection from {}", addr);

        let config = Arc::clone(&config);
        let fs = Arc::clone(&fs);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, config, fs).await {
                warn!("Connection error for {}: {:?}", addr, e);
            }
            info!("Connection closed for {}", addr);
        });
    }
}

/// Runs one control connection until the client leaves, goes idle or the
/// connection breaks.
pub async fn handle_connection(
    socket: TcpStream,
    config: Arc<Config>,
    fs: Arc<LocalFileSystem>,
) -> Result<()> {
    let peer_addr = socket.peer_addr()?;
    let (read_half, write_half) = socket.into_split();
    let writer: ControlWriter = Arc::new(Mutex::new(write_half));
    let session = Arc::new(Mutex::new(Session::new(fs, peer_addr)));
    let handlers = initialize_command_handlers();

    let idle_timeout = config.server.idle_timeout();
    let line_limit = config.server.control_buffer_size as u64;
    let mut reader = BufReader::new(read_half);
    let mut line = Vec::new();

    send_reply(&writer, 220, "Service ready for new user.").await?;

    loop {
        line.clear();
        let mut limited = (&mut reader).take(line_limit);
        let n = match timeout(idle_timeout, limited.read_until(b'\n', &mut line)).await {
            Ok(result) => result?,
            Err(_) => {
                info!("{} idle for {:?}, closing", peer_addr, idle_timeout);
                break;
            }
        };
        if n == 0 {
            info!("Client {} disconnected", peer_addr);
            break;
        }
        if n as u64 == line_limit && !line.ends_with(b"\n") {
            match timeout(idle_timeout, discard_line(&mut reader)).await {
                Ok(result) => result?,
                Err(_) => {
                    info!("{} idle for {:?}, closing", peer_addr, idle_timeout);
                    break;
                }
            }
            warn!("{} sent a command line over {} bytes", peer_addr, line_limit);
            send_reply(&writer, 500, "Command line too long.").await?;
            continue;
        }

        let command_line = String::from_utf8_lossy(&line);
        let (verb, arg) = split_command(&command_line);
        if verb.is_empty() {
            send_reply(&writer, 500, "Syntax error, command unrecognized.").await?;
            continue;
        }
        if verb == "PASS" {
            debug!("{} <-- PASS ****", peer_addr);
        } else {
            debug!("{} <-- {}", peer_addr, command_line.trim_end());
        }

        let command = verb.parse::<FtpCommand>().ok();
        match command.and_then(|command| handlers.get(&command)) {
            Some(handler) => {
                let result = handler(
                    Arc::clone(&writer),
                    Arc::clone(&config),
                    Arc::clone(&session),
                    arg,
                )
                .await;
                if let Err(e) = result {
                    error!("Error handling command {}: {:?}", verb, e);
                    break;
                }
            }
            None => handle_unknown_command(&writer, &verb).await?,
        }

        if command == Some(FtpCommand::Quit) {
            break;
        }
    }

    if let Err(e) = writer.lock().await.shutdown().await {
        debug!("Control connection to {} already gone: {}", peer_addr, e);
    }
    Ok(())
}

/// Skips the rest of the current line, up to and including its `\n`.
async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}
