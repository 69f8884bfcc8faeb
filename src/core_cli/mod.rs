use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "sandftpd", about = "A minimal active-mode FTP server with a sandboxed root.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on
    #[arg(short, long)]
    pub listen_address: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory served as the FTP root
    #[arg(short, long)]
    pub base_dir: Option<String>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
