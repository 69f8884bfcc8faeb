use crate::config::Config;
use crate::core_ftpcommand::utils::reject_missing_argument;
use crate::core_network::data_channel::{send_data, take_endpoint};
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the RETR (Retrieve) FTP command.
///
/// The file is opened before the data phase starts, so a missing file
/// answers 550 without consuming the endpoint set by PORT.
///
/// # Arguments
///
/// * `writer` - A shared, locked control stream for writing responses to the client.
/// * `config` - A shared server configuration.
/// * `session` - The session holding the current directory and data endpoint.
/// * `arg` - The name of the file to retrieve.
pub async fn handle_retr_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if reject_missing_argument(&writer, "RETR", &arg).await? {
        return Ok(());
    }

    let mut session = session.lock().await;
    let path = session.virtual_path(&arg);

    let mut chunks = match session.fs().read_bytes(&path).await {
        Ok(chunks) => chunks,
        Err(e) => {
            error!("RETR {} refused: {}", path, e);
            let (code, text) = e.to_ftp_response();
            return send_reply(&writer, code, text).await;
        }
    };

    let Some(endpoint) = take_endpoint(&writer, &mut session).await? else {
        return Ok(());
    };
    info!("Sending {} to {}", path, endpoint);
    send_data(
        &writer,
        endpoint,
        &mut chunks,
        config.server.download_buffer_size,
        config.server.idle_timeout(),
    )
    .await
}
