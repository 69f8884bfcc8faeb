use crate::config::Config;
use crate::core_ftpcommand::utils::reject_missing_argument;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the RMD (Remove Directory) FTP command.
///
/// Only empty directories go away. Missing targets, plain files, non-empty
/// directories and the sandbox root answer 550.
pub async fn handle_rmd_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if reject_missing_argument(&writer, "RMD", &arg).await? {
        return Ok(());
    }

    let session = session.lock().await;
    let path = session.virtual_path(&arg);
    match session.fs().remove_directory(&path).await {
        Ok(()) => {
            info!("RMD {} succeeded", path);
            send_reply(&writer, 250, "Directory removed.").await
        }
        Err(e) => {
            error!("RMD {} failed: {}", path, e);
            let (code, text) = e.to_ftp_response();
            send_reply(&writer, code, text).await
        }
    }
}
