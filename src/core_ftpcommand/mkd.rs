use crate::config::Config;
use crate::core_ftpcommand::utils::reject_missing_argument;
use crate::helpers::{quote_path, send_reply, ControlWriter};
use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the MKD (Make Directory) FTP command.
///
/// Creates one directory below the current directory (or at an absolute
/// virtual path). Escaping the sandbox and already existing targets both
/// answer 550.
///
/// # Arguments
///
/// * `writer` - A shared, locked control stream for writing responses to the client.
/// * `_config` - A shared server configuration.
/// * `session` - The session whose current directory anchors relative paths.
/// * `arg` - The directory to create.
pub async fn handle_mkd_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if reject_missing_argument(&writer, "MKD", &arg).await? {
        return Ok(());
    }

    let session = session.lock().await;
    let path = session.virtual_path(&arg);
    let result = match path.normalize() {
        Ok(normalized) => session.fs().make_directory(&normalized).await.map(|_| normalized),
        Err(e) => Err(e),
    };

    match result {
        Ok(created) => {
            info!("MKD {} succeeded", created);
            let response = format!("{} directory created.", quote_path(created.as_str()));
            send_reply(&writer, 257, &response).await
        }
        Err(e) => {
            error!("MKD {} failed: {}", path, e);
            let (code, text) = e.to_ftp_response();
            send_reply(&writer, code, text).await
        }
    }
}
