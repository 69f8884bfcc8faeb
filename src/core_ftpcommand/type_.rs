use crate::config::Config;
use crate::core_ftpcommand::utils::reject_missing_argument;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the TYPE FTP command.
///
/// Every transfer is binary, so the representation type is acknowledged
/// and otherwise ignored.
pub async fn handle_type_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    _session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if reject_missing_argument(&writer, "TYPE", &arg).await? {
        return Ok(());
    }
    info!("TYPE {} acknowledged", arg);
    let response = format!("Type set to {}.", arg.trim().to_ascii_uppercase());
    send_reply(&writer, 200, &response).await
}
