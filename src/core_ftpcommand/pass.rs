use crate::config::Config;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the PASS FTP command. USER already logged the client in, so any
/// password is fine.
pub async fn handle_pass_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    _session: Arc<Mutex<Session>>,
    _password: String,
) -> Result<(), std::io::Error> {
    send_reply(&writer, 230, "User logged in, proceed.").await
}
