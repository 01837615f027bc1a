//! postboard-cli: scripted access to the posts backend.
//! Shares the board's REST client so both speak the same wire format.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli};
use handlers::posts;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = build_ctx_from_cli(&cli)?;

    match cli.command {
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}
