use crate::config::Config;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the FEAT FTP command. No extensions are offered.
pub async fn handle_feat_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    _session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    send_reply(&writer, 211, "No features.").await
}
