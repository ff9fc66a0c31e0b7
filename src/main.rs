mod app;
mod components;
mod config;
mod data;
mod events;
mod logging;
mod theme;
mod utils;

use std::io::stdout;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use tokio::sync::mpsc;

use crate::app::App;
use crate::config::Config;
use crate::data::WalletService;
use crate::data::chains;
use crate::data::deployments::DeploymentTable;
use crate::data::provider::LocalWallet;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();
    let log_path = logging::init(config.log_file.as_deref())?;

    let deployments = match &config.deployments {
        Some(path) => DeploymentTable::load(path)?,
        None => DeploymentTable::builtin()?,
    };
    let deployments = Arc::new(deployments);

    let mut available = chains::available_chains(&deployments);
    let chain = chains::resolve_chain(&config.chain, &available)
        .ok_or_else(|| eyre!("Unknown chain '{}'", config.chain))?;
    if let Some(rpc_url) = &config.rpc_url {
        if let Some(info) = available.iter_mut().find(|c| c.id == chain) {
            info.rpc_url = rpc_url.clone();
        }
    }

    tracing::info!(
        %chain,
        deployments = deployments.len(),
        log = %log_path.display(),
        "starting input-tui"
    );

    let wallet = LocalWallet::new(
        config.private_key.as_deref(),
        available,
        Arc::clone(&deployments),
        chain,
    )?;

    // Create event channel
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let wallet_service = WalletService::new(Arc::new(wallet), event_tx.clone());

    let mut app = App::new(
        wallet_service,
        deployments,
        config.dapp_address.unwrap_or_default(),
        event_tx,
        event_rx,
        config.tick_rate_ms,
    );

    if let Some(path) = config.file {
        app.load_path(path);
    }

    // Initialize terminal; file drops arrive as bracketed pastes
    let terminal = ratatui::init();
    execute!(stdout(), EnableBracketedPaste).wrap_err("Failed to enable bracketed paste")?;
    let result = app.run(terminal).await;

    // Restore terminal
    let _ = execute!(stdout(), DisableBracketedPaste);
    ratatui::restore();

    result
}
