//! Slash command handlers.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use super::{BotState, keyboards, lookup_user, menu_keyboard, session::ChatMode};
use crate::strings::{Lang, Msg, text};
use crate::task::{format_admin_stats, format_stats_message};

/// Commands shown in the Telegram menu.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Change language")]
    Language,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Show word statistics")]
    Stats,
    #[command(description = "Reset all words")]
    Reset,
    #[command(description = "Operator statistics")]
    Admin,
}

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    let Some(from) = msg.from() else {
        return Ok(());
    };
    let telegram_id = from.id.0 as i64;

    // Every command leaves any pending import flow.
    state.sessions.set(msg.chat.id, ChatMode::Idle).await;

    match cmd {
        Command::Start => {
            start(&bot, &msg, telegram_id, from.username.as_deref(), &state).await
        }
        Command::Language => language(&bot, &msg, telegram_id, &state).await,
        Command::Help => help(&bot, &msg, telegram_id, &state).await,
        Command::Stats => stats(&bot, &msg, telegram_id, &state).await,
        Command::Reset => reset(&bot, &msg, telegram_id, &state).await,
        Command::Admin => admin(&bot, &msg, telegram_id, &state).await,
    }
}

async fn start(
    bot: &Bot,
    msg: &Message,
    telegram_id: i64,
    username: Option<&str>,
    state: &BotState,
) -> ResponseResult<()> {
    info!("/start from {} ({})", telegram_id, username.unwrap_or("no_username"));

    let detected = Lang::detect(msg.from().and_then(|u| u.language_code.as_deref()));

    let user = match state.store.upsert_user(telegram_id, username, detected).await {
        Ok(user) => user,
        Err(e) => {
            error!("Failed to save user {}: {}", telegram_id, e);
            bot.send_message(msg.chat.id, text(Lang::En, Msg::GenericError))
                .await?;
            return Ok(());
        }
    };

    let lang = user.lang();
    bot.send_message(msg.chat.id, text(lang, Msg::Welcome))
        .reply_markup(keyboards::language_keyboard())
        .await?;
    bot.send_message(msg.chat.id, text(lang, Msg::AddWordsInstruction))
        .reply_markup(menu_keyboard(state, lang, telegram_id))
        .await?;

    Ok(())
}

async fn language(
    bot: &Bot,
    msg: &Message,
    telegram_id: i64,
    state: &BotState,
) -> ResponseResult<()> {
    let lang = current_lang(state, telegram_id).await;

    bot.send_message(msg.chat.id, text(lang, Msg::LangPick))
        .reply_markup(keyboards::language_keyboard())
        .await?;

    Ok(())
}

async fn help(bot: &Bot, msg: &Message, telegram_id: i64, state: &BotState) -> ResponseResult<()> {
    let lang = current_lang(state, telegram_id).await;

    bot.send_message(msg.chat.id, text(lang, Msg::HelpMessage))
        .await?;

    Ok(())
}

async fn stats(bot: &Bot, msg: &Message, telegram_id: i64, state: &BotState) -> ResponseResult<()> {
    let Some(user) = lookup_user(bot, state, msg.chat.id, telegram_id).await? else {
        return Ok(());
    };
    let lang = user.lang();
    let keyboard = menu_keyboard(state, lang, telegram_id);

    let stats = match state.store.word_stats(&user.id).await {
        Ok(stats) => stats,
        Err(e) => {
            error!("Failed to load stats for {}: {}", user.id, e);
            bot.send_message(msg.chat.id, text(lang, Msg::GenericError))
                .await?;
            return Ok(());
        }
    };

    if stats.total == 0 {
        bot.send_message(msg.chat.id, text(lang, Msg::StatsNoWords))
            .reply_markup(keyboard)
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, format_stats_message(lang, &stats))
        .reply_markup(keyboard)
        .await?;

    Ok(())
}

async fn reset(bot: &Bot, msg: &Message, telegram_id: i64, state: &BotState) -> ResponseResult<()> {
    let lang = current_lang(state, telegram_id).await;

    bot.send_message(msg.chat.id, text(lang, Msg::ResetConfirmation))
        .reply_markup(keyboards::reset_confirm_keyboard(lang))
        .await?;

    Ok(())
}

async fn admin(bot: &Bot, msg: &Message, telegram_id: i64, state: &BotState) -> ResponseResult<()> {
    let lang = current_lang(state, telegram_id).await;

    if !state.config.is_admin(telegram_id) {
        warn!("Non-operator {} tried to access admin stats", telegram_id);
        bot.send_message(msg.chat.id, text(lang, Msg::PermissionDenied))
            .await?;
        return Ok(());
    }

    match state.store.global_stats().await {
        Ok(stats) => {
            bot.send_message(msg.chat.id, format_admin_stats(lang, &stats))
                .reply_markup(keyboards::admin_keyboard(lang))
                .await?;
        }
        Err(e) => {
            error!("Failed to load global stats: {}", e);
            bot.send_message(msg.chat.id, text(lang, Msg::GenericError))
                .await?;
        }
    }

    Ok(())
}

/// The user's stored language, or English before first `/start`.
async fn current_lang(state: &BotState, telegram_id: i64) -> Lang {
    state
        .store
        .user_by_telegram_id(telegram_id)
        .await
        .ok()
        .flatten()
        .map_or(Lang::En, |user| user.lang())
}
