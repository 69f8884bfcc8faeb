use crate::config::Config;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the QUIT FTP command.
///
/// Only says goodbye; the connection loop closes the control connection
/// once this reply is out.
pub async fn handle_quit_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    {
        let session = session.lock().await;
        info!(
            "Received QUIT from {} ({})",
            session.peer_addr(),
            session.username().unwrap_or("not logged in")
        );
    }
    send_reply(&writer, 221, "Service closing control connection.").await
}
