use crate::helpers::{send_reply, ControlWriter};
use log::warn;

/// Answers 501 when a command that needs an argument got none.
///
/// Returns `true` when the reply was sent and the handler should stop.
pub async fn reject_missing_argument(
    writer: &ControlWriter,
    verb: &str,
    arg: &str,
) -> Result<bool, std::io::Error> {
    if !arg.trim().is_empty() {
        return Ok(false);
    }
    warn!("{} command received with no arguments", verb);
    send_reply(writer, 501, "Syntax error in parameters or arguments.").await?;
    Ok(true)
}
