use crate::config::Config;
use crate::core_network::data_channel::{send_data, take_endpoint};
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Target of a LIST argument. Leading `ls`-style flags (`-la`) are skipped.
fn list_target(arg: &str) -> &str {
    let mut rest = arg.trim();
    while rest.starts_with('-') {
        rest = match rest.find(char::is_whitespace) {
            Some(end) => rest[end..].trim_start(),
            None => "",
        };
    }
    if rest.is_empty() {
        "."
    } else {
        rest
    }
}

/// Handles the LIST FTP command.
///
/// Sends one name per line over the data connection, directories with a
/// trailing `/`. Anything but a directory answers 550 and leaves the
/// pending endpoint untouched.
pub async fn handle_list_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    let path = session.virtual_path(list_target(&arg));

    let mut entries = match session.fs().list(&path).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("LIST {} refused: {}", path, e);
            return send_reply(&writer, 550, "Failed to list directory.").await;
        }
    };

    let Some(endpoint) = take_endpoint(&writer, &mut session).await? else {
        return Ok(());
    };
    info!("Listing {} to {}", path, endpoint);
    send_data(
        &writer,
        endpoint,
        &mut entries,
        config.server.download_buffer_size,
        config.server.idle_timeout(),
    )
    .await
}
