use crate::config::Config;
use crate::core_ftpcommand::utils::reject_missing_argument;
use crate::core_network::data_channel::{receive_data, take_endpoint};
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the STOR (Store File) FTP command.
///
/// The destination is checked before the data phase: nothing is created
/// when the path escapes the sandbox, names a directory or lives in a
/// missing directory. An existing file is replaced.
///
/// # Arguments
///
/// * `writer` - A shared, locked control stream for writing responses to the client.
/// * `config` - A shared server configuration.
/// * `session` - The session holding the current directory and data endpoint.
/// * `arg` - The name of the file to be stored.
pub async fn handle_stor_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if reject_missing_argument(&writer, "STOR", &arg).await? {
        return Ok(());
    }

    let mut session = session.lock().await;
    let path = session.virtual_path(&arg);

    if let Err(e) = session.fs().check_writable(&path).await {
        error!("STOR {} refused: {}", path, e);
        let (code, text) = e.to_ftp_response();
        return send_reply(&writer, code, text).await;
    }

    let Some(endpoint) = take_endpoint(&writer, &mut session).await? else {
        return Ok(());
    };
    info!("Receiving {} from {}", path, endpoint);
    receive_data(
        &writer,
        endpoint,
        session.fs(),
        &path,
        config.server.upload_buffer_size,
        config.server.idle_timeout(),
    )
    .await
}
