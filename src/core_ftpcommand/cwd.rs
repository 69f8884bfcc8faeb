use crate::config::Config;
use crate::core_ftpcommand::utils::reject_missing_argument;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::warn;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the CWD FTP command.
///
/// The new directory is only committed when it exists inside the sandbox.
pub async fn handle_cwd_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if reject_missing_argument(&writer, "CWD", &arg).await? {
        return Ok(());
    }
    change_directory(&writer, &session, &arg).await
}

/// Shared by CWD and CDUP.
pub(crate) async fn change_directory(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
    arg: &str,
) -> Result<(), std::io::Error> {
    let result = session.lock().await.change_directory(arg).await.map(|_| ());
    match result {
        Ok(()) => send_reply(writer, 250, "Directory successfully changed.").await,
        Err(e) => {
            warn!("CWD {} failed: {}", arg, e);
            send_reply(writer, 550, "Failed to change directory.").await
        }
    }
}
