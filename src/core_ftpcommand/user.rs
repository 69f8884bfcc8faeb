use crate::config::Config;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the USER FTP command.
///
/// Any username is accepted and logged in straight away; there is no
/// password step.
///
/// # Arguments
///
/// * `writer` - A shared, locked control stream for writing responses to the client.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - The session the username is recorded on.
/// * `username` - The username provided by the client.
pub async fn handle_user_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    username: String,
) -> Result<(), std::io::Error> {
    {
        let mut session = session.lock().await;
        session.set_username(&username);
        info!("User {:?} logged in from {}", username, session.peer_addr());
    }
    send_reply(&writer, 230, "User logged in, proceed.").await
}
