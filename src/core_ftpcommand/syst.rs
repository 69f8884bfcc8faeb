use crate::config::Config;
use crate::constants::SYSTEM_TYPE;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the SYST (System) FTP command.
pub async fn handle_syst_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    _session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    send_reply(&writer, 215, SYSTEM_TYPE).await
}
