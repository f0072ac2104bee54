//! Card Vault CLI - Store and reveal cards and identity documents
//!
//! Sensitive fields are only printed after the record's PIN has been
//! entered, and only until the disclosure window closes.

mod commands;
mod output;
mod reveal;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = commands::Cli::parse();
    commands::run(cli).await
}
