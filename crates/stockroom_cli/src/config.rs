//! Command-line and environment configuration.

use clap::{Args, Parser, Subcommand};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inventory store with tool-protocol and HTTP front-ends")]
pub struct Cli {
    /// JSON file holding the inventory table.
    #[arg(
        long,
        env = "STOCKROOM_INVENTORY_FILE",
        default_value = "inventory.json",
        global = true
    )]
    pub inventory_file: PathBuf,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "STOCKROOM_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Directory for rolling log files; defaults to `./logs`.
    #[arg(long, env = "STOCKROOM_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve tool calls as line-delimited JSON-RPC on stdin/stdout (default).
    Stdio,
    /// Serve the REST API.
    Http(HttpArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct HttpArgs {
    #[arg(long, env = "STOCKROOM_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,
    #[arg(long, env = "STOCKROOM_PORT", default_value_t = 8000)]
    pub port: u16,
}

impl HttpArgs {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Stdio)
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| stockroom_core::default_log_level())
    }

    /// Absolute log directory, resolved against `cwd` when relative.
    pub fn log_dir(&self, cwd: &Path) -> PathBuf {
        let dir = self
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("logs"));
        if dir.is_absolute() {
            dir
        } else {
            cwd.join(dir)
        }
    }
}
