//! Hanzi Trainer Bot - Main Entry Point
//!
//! A Telegram bot that stores users' Chinese vocabulary and generates
//! practice sentences from their least-used words.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use teloxide::utils::command::BotCommands as _;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use hanzi_trainer_bot::bot::{BotState, Command, build_handler};
use hanzi_trainer_bot::config::AppConfig;
use hanzi_trainer_bot::server;
use hanzi_trainer_bot::store::Store;

/// Telegram bot for learning Chinese vocabulary.
#[derive(Parser, Debug)]
#[command(name = "hanzi_trainer_bot")]
#[command(about = "Telegram bot for learning Chinese vocabulary")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Load and validate configuration
    let config =
        AppConfig::from_env().context("Failed to load configuration from environment")?;

    // Open the database
    let store = Store::connect(&config.database_url)
        .await
        .context("Failed to open the database")?;

    let bot = Bot::new(config.bot_token.clone());

    // Publish the command menu
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to set bot commands: {}", e);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let webhook_url = config.webhook_url.clone();
    let state = Arc::new(BotState::new(config, store));

    let mut dispatcher = Dispatcher::builder(bot.clone(), build_handler())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build();

    if let Some(url) = webhook_url {
        info!("Starting in webhook mode on {} ({})", addr, url);

        let (listener, stop_flag, webhook_router) =
            webhooks::axum_to_router(bot, webhooks::Options::new(addr, url))
                .await
                .context("Failed to register the webhook")?;

        let app = webhook_router.merge(server::health_router());
        tokio::spawn(server::serve(addr, app, stop_flag));

        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        info!("Starting with long polling; health endpoint on {}", addr);

        tokio::spawn(server::serve(
            addr,
            server::health_router(),
            std::future::pending(),
        ));

        dispatcher.dispatch().await;
    }

    info!("Shutting down...");
    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
