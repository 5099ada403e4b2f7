//! `stockroom` entry point.
//!
//! Runs the tool-protocol session on stdio by default, or the REST API with
//! the `http` subcommand. Both front-ends share one inventory service.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Cli, Command};
use log::{info, warn};
use std::io::{stdin, stdout};
use std::sync::Arc;
use stockroom_core::{init_logging, open_inventory, LoadStatus};
use stockroom_tools::{ToolDispatcher, ToolSession};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to read current directory")?;

    init_logging(cli.log_level(), &cli.log_dir(&cwd)).context("failed to initialize logging")?;

    let inventory_file = if cli.inventory_file.is_absolute() {
        cli.inventory_file.clone()
    } else {
        cwd.join(&cli.inventory_file)
    };
    let (service, status) = open_inventory(&inventory_file)
        .with_context(|| format!("failed to open inventory `{}`", inventory_file.display()))?;
    match &status {
        LoadStatus::RecoveredFromCorruption { .. } => warn!(
            "event=inventory_open module=cli status=warn error_code=corrupt_file_discarded"
        ),
        LoadStatus::Loaded { count } => {
            info!("event=inventory_open module=cli status=ok count={}", count)
        }
        LoadStatus::Missing => info!("event=inventory_open module=cli status=ok count=0"),
    }
    let service = Arc::new(service);

    match cli.command() {
        Command::Stdio => {
            let session = ToolSession::new(ToolDispatcher::new(service));
            session
                .run(stdin().lock(), stdout().lock())
                .context("tool session failed")?;
        }
        Command::Http(args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            runtime
                .block_on(stockroom_http::serve(service, args.socket_addr()))
                .context("http server failed")?;
        }
    }

    Ok(())
}
