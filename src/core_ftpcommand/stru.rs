use crate::config::Config;
use crate::core_ftpcommand::utils::reject_missing_argument;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the STRU FTP command. Only file structure exists here.
pub async fn handle_stru_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    _session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if reject_missing_argument(&writer, "STRU", &arg).await? {
        return Ok(());
    }
    if arg.trim().eq_ignore_ascii_case("F") {
        send_reply(&writer, 200, "Structure set to F.").await
    } else {
        send_reply(&writer, 504, "Command not implemented for that parameter.").await
    }
}
