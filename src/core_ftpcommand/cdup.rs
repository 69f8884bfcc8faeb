use crate::config::Config;
use crate::core_ftpcommand::cwd::change_directory;
use crate::helpers::ControlWriter;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the CDUP FTP command, i.e. `CWD ..`.
pub async fn handle_cdup_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    change_directory(&writer, &session, "..").await
}
