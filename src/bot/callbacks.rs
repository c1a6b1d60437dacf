//! Callback query handlers for the inline keyboards.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::{debug, error, warn};

use super::{BotState, keyboards, lookup_user, menu_keyboard, session::ChatMode};
use crate::strings::{Lang, Msg, text};
use crate::task::{self, format_admin_stats, format_task_message, matched_word_ids};

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    // Telegram retries callback deliveries; drop ids we already handled.
    {
        let mut seen = state.seen_callbacks.lock().await;
        if !seen.insert(&q.id) {
            debug!("Duplicate callback {}, ignoring", q.id);
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
    }

    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.clone() else {
        return Ok(());
    };
    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
        return Ok(());
    };
    let message_id = q.message.as_ref().map(|m| m.id());
    let telegram_id = q.from.id.0 as i64;

    if let Some(code) = data.strip_prefix("lang_") {
        return select_language(&bot, &state, chat_id, message_id, telegram_id, code).await;
    }

    match data.as_str() {
        "get_task" => get_task(&bot, &state, chat_id, telegram_id).await,
        "add_words" => add_words(&bot, &state, chat_id, telegram_id).await,
        "reset_words" => reset_words(&bot, &state, chat_id, telegram_id).await,
        "reset_confirm_yes" => {
            reset_confirm(&bot, &state, chat_id, message_id, telegram_id, true).await
        }
        "reset_confirm_no" => {
            reset_confirm(&bot, &state, chat_id, message_id, telegram_id, false).await
        }
        "admin_stats" => admin_stats(&bot, &state, chat_id, telegram_id).await,
        "import_text" => {
            import_choice(&bot, &state, chat_id, telegram_id, ChatMode::AwaitingWords).await
        }
        "import_csv" => {
            import_choice(&bot, &state, chat_id, telegram_id, ChatMode::AwaitingCsv).await
        }
        "import_gsheet" => {
            import_choice(&bot, &state, chat_id, telegram_id, ChatMode::AwaitingSheetLink).await
        }
        "import_notion" => import_notion(&bot, &state, chat_id, telegram_id).await,
        other => {
            debug!("Unknown callback data: {}", other);
            Ok(())
        }
    }
}

async fn select_language(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    telegram_id: i64,
    code: &str,
) -> ResponseResult<()> {
    let Ok(lang) = code.parse::<Lang>() else {
        debug!("Ignoring unknown language callback: {}", code);
        return Ok(());
    };

    match state.store.update_user_language(telegram_id, lang).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            bot.send_message(chat_id, text(Lang::En, Msg::UserNotFound))
                .await?;
            return Ok(());
        }
        Err(e) => {
            error!("Failed to change language for {}: {}", telegram_id, e);
            bot.send_message(chat_id, text(lang, Msg::GenericError))
                .await?;
            return Ok(());
        }
    }

    if let Some(message_id) = message_id {
        bot.edit_message_text(chat_id, message_id, text(lang, Msg::LangSelected))
            .await?;
    } else {
        bot.send_message(chat_id, text(lang, Msg::LangSelected))
            .await?;
    }

    bot.send_message(chat_id, text(lang, Msg::AddWordsInstruction))
        .reply_markup(menu_keyboard(state, lang, telegram_id))
        .await?;

    Ok(())
}

async fn get_task(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    telegram_id: i64,
) -> ResponseResult<()> {
    state.sessions.set(chat_id, ChatMode::Idle).await;

    let Some(user) = lookup_user(bot, state, chat_id, telegram_id).await? else {
        return Ok(());
    };
    let lang = user.lang();
    let keyboard = menu_keyboard(state, lang, telegram_id);

    let words = match state
        .store
        .least_used_words(&user.id, state.config.task_word_count)
        .await
    {
        Ok(words) => words,
        Err(e) => {
            error!("Failed to load words for {}: {}", user.id, e);
            bot.send_message(chat_id, text(lang, Msg::GenericError))
                .await?;
            return Ok(());
        }
    };

    if words.is_empty() {
        bot.send_message(chat_id, text(lang, Msg::NoWordsError))
            .reply_markup(keyboard)
            .await?;
        return Ok(());
    }

    match task::generate_sentences(&state.config.ai, &state.http, &words, lang).await {
        Ok(sentences) => {
            let used_ids = matched_word_ids(&words, &sentences);
            if let Err(e) = state.store.update_words_usage(&user.id, &used_ids).await {
                // The task is still worth sending; only the counters lag.
                error!("Failed to update word usage for {}: {}", user.id, e);
            }

            bot.send_message(chat_id, format_task_message(lang, &sentences))
                .reply_markup(keyboard)
                .await?;
        }
        Err(e) => {
            error!("Task generation failed for {}: {}", user.id, e);
            bot.send_message(chat_id, text(lang, Msg::TaskGenerationError))
                .reply_markup(keyboard)
                .await?;
        }
    }

    Ok(())
}

async fn add_words(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    telegram_id: i64,
) -> ResponseResult<()> {
    let Some(user) = lookup_user(bot, state, chat_id, telegram_id).await? else {
        return Ok(());
    };
    let lang = user.lang();

    bot.send_message(chat_id, text(lang, Msg::AddWordsInstruction))
        .reply_markup(keyboards::import_keyboard(lang))
        .await?;

    Ok(())
}

async fn import_choice(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    telegram_id: i64,
    mode: ChatMode,
) -> ResponseResult<()> {
    let msg = match mode {
        ChatMode::AwaitingWords => Msg::SendWordsText,
        ChatMode::AwaitingCsv => Msg::SendCsvFile,
        ChatMode::AwaitingSheetLink => Msg::SendSheetLink,
        ChatMode::AwaitingNotionLink => Msg::SendNotionLink,
        ChatMode::Idle => return Ok(()),
    };

    let Some(user) = lookup_user(bot, state, chat_id, telegram_id).await? else {
        return Ok(());
    };

    state.sessions.set(chat_id, mode).await;
    bot.send_message(chat_id, text(user.lang(), msg)).await?;

    Ok(())
}

async fn import_notion(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    telegram_id: i64,
) -> ResponseResult<()> {
    let Some(user) = lookup_user(bot, state, chat_id, telegram_id).await? else {
        return Ok(());
    };
    let lang = user.lang();

    if state.config.notion_token.is_none() {
        warn!("Notion import requested but NOTION_TOKEN is not configured");
        bot.send_message(chat_id, text(lang, Msg::WordsImportError))
            .await?;
        return Ok(());
    }

    import_choice(bot, state, chat_id, telegram_id, ChatMode::AwaitingNotionLink).await
}

async fn reset_words(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    telegram_id: i64,
) -> ResponseResult<()> {
    state.sessions.set(chat_id, ChatMode::Idle).await;

    let Some(user) = lookup_user(bot, state, chat_id, telegram_id).await? else {
        return Ok(());
    };
    let lang = user.lang();

    bot.send_message(chat_id, text(lang, Msg::ResetConfirmation))
        .reply_markup(keyboards::reset_confirm_keyboard(lang))
        .await?;

    Ok(())
}

async fn reset_confirm(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    telegram_id: i64,
    confirmed: bool,
) -> ResponseResult<()> {
    state.sessions.set(chat_id, ChatMode::Idle).await;

    let Some(user) = lookup_user(bot, state, chat_id, telegram_id).await? else {
        return Ok(());
    };
    let lang = user.lang();

    let reply = if confirmed {
        if let Err(e) = state.store.reset_words(&user.id).await {
            error!("Failed to reset words for {}: {}", user.id, e);
            bot.send_message(chat_id, text(lang, Msg::GenericError))
                .await?;
            return Ok(());
        }
        text(lang, Msg::ResetSuccess)
    } else {
        text(lang, Msg::ResetCanceled)
    };

    if let Some(message_id) = message_id {
        bot.edit_message_text(chat_id, message_id, reply)
            .reply_markup(menu_keyboard(state, lang, telegram_id))
            .await?;
    } else {
        bot.send_message(chat_id, reply)
            .reply_markup(menu_keyboard(state, lang, telegram_id))
            .await?;
    }

    Ok(())
}

async fn admin_stats(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    telegram_id: i64,
) -> ResponseResult<()> {
    let Some(user) = lookup_user(bot, state, chat_id, telegram_id).await? else {
        return Ok(());
    };
    let lang = user.lang();

    if !state.config.is_admin(telegram_id) {
        warn!("Non-operator {} tried to access admin stats", telegram_id);
        bot.send_message(chat_id, text(lang, Msg::PermissionDenied))
            .await?;
        return Ok(());
    }

    match state.store.global_stats().await {
        Ok(stats) => {
            bot.send_message(chat_id, format_admin_stats(lang, &stats))
                .reply_markup(keyboards::admin_keyboard(lang))
                .await?;
        }
        Err(e) => {
            error!("Failed to load global stats: {}", e);
            bot.send_message(chat_id, text(lang, Msg::GenericError))
                .await?;
        }
    }

    Ok(())
}
