//! Card Vault TUI - Terminal interface for PIN-gated cards and documents
//!
//! Lists the signed-in user's records with sensitive fields masked. Opening a
//! record starts a reveal session: a 4-digit PIN pad, a lockout countdown
//! after repeated wrong PINs and a one-minute disclosure window once the PIN
//! matches.

use std::io;
use std::panic;

use anyhow::{bail, Context, Result};
use cardvault_store::{StoreClient, StoreConfig};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod ui;

use app::App;

/// Application entry point with panic handling for terminal restoration
#[tokio::main]
async fn main() -> Result<()> {
    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let config = load_config()?;
    init_logging(&config)?;

    let client = StoreClient::open(config)
        .await
        .context("Failed to open vault")?;
    if client.session().is_err() {
        bail!("No user signed in. Set CARDVAULT_OWNER or \"owner\" in the config file");
    }

    let result = run_app(client).await;

    if let Err(e) = &result {
        tracing::error!("Application error: {}", e);
    }

    result
}

fn load_config() -> Result<StoreConfig> {
    let path = StoreConfig::default_path();
    let (mut config, fresh) = StoreConfig::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    if fresh {
        config.save(&path)?;
    }
    config.apply_env()?;
    Ok(config)
}

/// Log to a file in the data directory; stdout belongs to the terminal UI
fn init_logging(config: &StoreConfig) -> Result<()> {
    config.ensure_directories()?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .with_context(|| format!("Failed to open log file {:?}", config.log_path()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(log_file)),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive("cardvault_tui=info".parse()?)
                .add_directive("cardvault_reveal=info".parse()?)
                .add_directive("cardvault_store=info".parse()?),
        )
        .init();
    Ok(())
}

/// Main application runner
async fn run_app(client: StoreClient) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client);
    app.reload_records().await;
    let result = app.run(&mut terminal).await;
    app.close().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
