//! Standalone helper that registers the Telegram webhook.
//!
//! Reads `TG_BOT_TOKEN` and `WEBHOOK_URL` from the environment and calls
//! `setWebhook` once. Run it after deploying the bot behind a new URL.

use anyhow::{Context, Result};
use clap::Parser;
use teloxide::prelude::*;
use url::Url;

/// Webhook registration helper.
#[derive(Parser, Debug)]
#[command(name = "set_webhook")]
#[command(about = "Registers the Telegram webhook URL for the bot")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _ = dotenvy::from_filename(&args.env_file);

    let token =
        std::env::var("TG_BOT_TOKEN").context("TG_BOT_TOKEN environment variable is not set")?;
    let raw_url =
        std::env::var("WEBHOOK_URL").context("WEBHOOK_URL environment variable is not set")?;
    let url = Url::parse(&raw_url).context("WEBHOOK_URL is not a valid URL")?;

    let bot = Bot::new(token);
    bot.set_webhook(url)
        .await
        .context("Failed to set webhook")?;

    println!("✓ Webhook set successfully to: {raw_url}");
    Ok(())
}
