#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;

use std::process;

use crate::command::CommandContext;
use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_CONFIG: &str = "llmwhisperer_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "llmwhisperer_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_COMMAND,
            error = %format!("{error:#}"),
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();

    let ctx = CommandContext::new(&cli);
    cli.command.execute(&ctx).await
}
