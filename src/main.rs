// agentdesk - subscription tooling for the agent portal

mod account;
mod admin;
mod cli;
mod config;
mod error;
mod expiry;
mod listings;
mod models;
mod store;

use clap::Parser;
use error::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::execute(args)
}
