use crate::config::Config;
use crate::core_ftpcommand::utils::reject_missing_argument;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the MODE FTP command. Only stream mode exists here.
pub async fn handle_mode_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    _session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if reject_missing_argument(&writer, "MODE", &arg).await? {
        return Ok(());
    }
    if arg.trim().eq_ignore_ascii_case("S") {
        send_reply(&writer, 200, "Mode set to S.").await
    } else {
        send_reply(&writer, 504, "Command not implemented for that parameter.").await
    }
}
