//! LinkShare server entry point.

use anyhow::Context;
use clap::Parser;
use linkshare_core::{connect, init_logging};
use linkshare_server::{serve, AppState, CliArgs, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    init_logging(args.log_level(), args.log_dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let target = args
        .storage_target()
        .context("invalid database url")?;
    let store = connect(&target).context("failed to open record store")?;

    serve(&ServerConfig::from(&args), AppState::new(store)).await
}
