use crate::config::Config;
use crate::core_ftpcommand::utils::reject_missing_argument;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the SIZE (File Size) FTP command.
///
/// Replies `213 <bytes>` for a regular file inside the sandbox, 550 otherwise.
pub async fn handle_size_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if reject_missing_argument(&writer, "SIZE", &arg).await? {
        return Ok(());
    }

    let session = session.lock().await;
    let path = session.virtual_path(&arg);
    match session.fs().size(&path).await {
        Ok(file_size) => {
            info!("File size for {} is {}", path, file_size);
            send_reply(&writer, 213, &file_size.to_string()).await
        }
        Err(e) => {
            error!("SIZE {} failed: {}", path, e);
            let (code, text) = e.to_ftp_response();
            send_reply(&writer, code, text).await
        }
    }
}
