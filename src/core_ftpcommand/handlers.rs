use crate::config::Config;
use crate::constants::SUPERFLUOUS_COMMANDS;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{
    cdup, cwd, dele, feat, list, mkd, mode, noop, pass, pwd, quit, retr, rmd, size, stor, stru,
    syst, type_, user,
};
use crate::core_network::port;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::info;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type CommandHandler = Box<
    dyn Fn(
            ControlWriter,
            Arc<Config>,
            Arc<Mutex<Session>>,
            String, // Rest of the command line
        ) -> Pin<Box<dyn Future<Output = Result<(), std::io::Error>> + Send>>
        + Send
        + Sync,
>;

fn boxed<F, Fut>(handler: F) -> CommandHandler
where
    F: Fn(ControlWriter, Arc<Config>, Arc<Mutex<Session>>, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), std::io::Error>> + Send + 'static,
{
    Box::new(move |writer, config, session, arg| Box::pin(handler(writer, config, session, arg)))
}

/// Builds the verb -> handler table used by one control connection.
pub fn initialize_command_handlers() -> HashMap<FtpCommand, CommandHandler> {
    let mut handlers: HashMap<FtpCommand, CommandHandler> = HashMap::new();

    handlers.insert(FtpCommand::User, boxed(user::handle_user_command));
    handlers.insert(FtpCommand::Pass, boxed(pass::handle_pass_command));
    handlers.insert(FtpCommand::Quit, boxed(quit::handle_quit_command));
    handlers.insert(FtpCommand::Noop, boxed(noop::handle_noop_command));
    handlers.insert(FtpCommand::Syst, boxed(syst::handle_syst_command));
    handlers.insert(FtpCommand::Feat, boxed(feat::handle_feat_command));
    handlers.insert(FtpCommand::Pwd, boxed(pwd::handle_pwd_command));
    handlers.insert(FtpCommand::Cwd, boxed(cwd::handle_cwd_command));
    handlers.insert(FtpCommand::Cdup, boxed(cdup::handle_cdup_command));
    handlers.insert(FtpCommand::Mkd, boxed(mkd::handle_mkd_command));
    handlers.insert(FtpCommand::Rmd, boxed(rmd::handle_rmd_command));
    handlers.insert(FtpCommand::Dele, boxed(dele::handle_dele_command));
    handlers.insert(FtpCommand::Type, boxed(type_::handle_type_command));
    handlers.insert(FtpCommand::Mode, boxed(mode::handle_mode_command));
    handlers.insert(FtpCommand::Stru, boxed(stru::handle_stru_command));
    handlers.insert(FtpCommand::Port, boxed(port::handle_port_command));
    handlers.insert(FtpCommand::Size, boxed(size::handle_size_command));
    handlers.insert(FtpCommand::List, boxed(list::handle_list_command));
    handlers.insert(FtpCommand::Stor, boxed(stor::handle_stor_command));
    handlers.insert(FtpCommand::Retr, boxed(retr::handle_retr_command));

    handlers
}

/// Fallback for verbs without a handler.
pub async fn handle_unknown_command(
    writer: &ControlWriter,
    verb: &str,
) -> Result<(), std::io::Error> {
    if SUPERFLUOUS_COMMANDS.contains(&verb) {
        info!("{} is superfluous here, ignoring", verb);
        send_reply(writer, 202, "Command not implemented, superfluous at this site.").await
    } else {
        info!("Unknown command: {}", verb);
        send_reply(writer, 502, "Command not implemented.").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_command_has_a_handler() {
        let handlers = initialize_command_handlers();
        for verb in [
            "USER", "PASS", "QUIT", "NOOP", "SYST", "FEAT", "PWD", "CWD", "CDUP", "MKD", "RMD",
            "DELE", "TYPE", "MODE", "STRU", "PORT", "SIZE", "LIST", "STOR", "RETR",
        ] {
            let command: FtpCommand = verb.parse().unwrap();
            assert!(handlers.contains_key(&command), "{}", verb);
        }
        assert_eq!(handlers.len(), 20);
    }
}
