use crate::config::Config;
use crate::core_ftpcommand::utils::reject_missing_argument;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the DELE (Delete File) FTP command.
pub async fn handle_dele_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if reject_missing_argument(&writer, "DELE", &arg).await? {
        return Ok(());
    }

    let session = session.lock().await;
    let path = session.virtual_path(&arg);
    match session.fs().remove_file(&path).await {
        Ok(()) => {
            info!("DELE {} succeeded", path);
            send_reply(&writer, 250, "File deleted.").await
        }
        Err(e) => {
            error!("DELE {} failed: {}", path, e);
            let (code, text) = e.to_ftp_response();
            send_reply(&writer, code, text).await
        }
    }
}
