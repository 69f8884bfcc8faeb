use crate::config::Config;
use crate::helpers::{quote_path, send_reply, ControlWriter};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the PWD FTP command: reports the session's virtual directory.
pub async fn handle_pwd_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let current_dir = session.lock().await.current_dir().to_string();
    let response = format!("{} is the current directory.", quote_path(&current_dir));
    send_reply(&writer, 257, &response).await
}
