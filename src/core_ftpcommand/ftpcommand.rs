use std::str::FromStr;

/// Verbs with a dedicated handler.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    User,
    Pass,
    Quit,
    Noop,
    Syst,
    Feat,
    Pwd,
    Cwd,
    Cdup,
    Mkd,
    Rmd,
    Dele,
    Type,
    Mode,
    Stru,
    Port,
    Size,
    List,
    Stor,
    Retr,
}

impl FromStr for FtpCommand {
    type Err = ();

    /// Case-insensitive.
    fn from_str(verb: &str) -> Result<Self, Self::Err> {
        match verb.to_ascii_uppercase().as_str() {
            "USER" => Ok(FtpCommand::User),
            "PASS" => Ok(FtpCommand::Pass),
            "QUIT" => Ok(FtpCommand::Quit),
            "NOOP" => Ok(FtpCommand::Noop),
            "SYST" => Ok(FtpCommand::Syst),
            "FEAT" => Ok(FtpCommand::Feat),
            "PWD" => Ok(FtpCommand::Pwd),
            "CWD" => Ok(FtpCommand::Cwd),
            "CDUP" => Ok(FtpCommand::Cdup),
            "MKD" => Ok(FtpCommand::Mkd),
            "RMD" => Ok(FtpCommand::Rmd),
            "DELE" => Ok(FtpCommand::Dele),
            "TYPE" => Ok(FtpCommand::Type),
            "MODE" => Ok(FtpCommand::Mode),
            "STRU" => Ok(FtpCommand::Stru),
            "PORT" => Ok(FtpCommand::Port),
            "SIZE" => Ok(FtpCommand::Size),
            "LIST" => Ok(FtpCommand::List),
            "STOR" => Ok(FtpCommand::Stor),
            "RETR" => Ok(FtpCommand::Retr),
            _ => Err(()),
        }
    }
}
