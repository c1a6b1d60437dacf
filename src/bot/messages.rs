//! Free-form message handling: word imports and hints.

use std::io::Cursor;
use std::sync::Arc;

use teloxide::net::Download;
use teloxide::prelude::*;
use tracing::{error, warn};

use super::{BotState, lookup_user, menu_keyboard, session::ChatMode};
use crate::import::{
    CsvImporter, ImportError, NotionImporter, ParsedWords, SheetImporter, TextImporter,
};
use crate::store::User;
use crate::strings::{Msg, text};
use crate::task::format_words_added;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(from) = msg.from() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;
    let telegram_id = from.id.0 as i64;
    let mode = state.sessions.mode(chat_id).await;

    if msg.document().is_some() {
        if mode == ChatMode::AwaitingCsv {
            return import_csv_document(&bot, &state, &msg, telegram_id).await;
        }
        return Ok(());
    }

    let Some(message_text) = msg.text() else {
        return Ok(());
    };
    // Unknown slash commands are not import input.
    if message_text.starts_with('/') {
        return Ok(());
    }

    match mode {
        ChatMode::Idle => {
            let Some(user) = lookup_user(&bot, &state, chat_id, telegram_id).await? else {
                return Ok(());
            };
            bot.send_message(chat_id, text(user.lang(), Msg::IdleHint))
                .reply_markup(menu_keyboard(&state, user.lang(), telegram_id))
                .await?;
            Ok(())
        }
        ChatMode::AwaitingWords => {
            let Some(user) = lookup_user(&bot, &state, chat_id, telegram_id).await? else {
                return Ok(());
            };
            let parsed = TextImporter.parse(message_text);
            store_parsed(&bot, &state, chat_id, &user, parsed).await
        }
        ChatMode::AwaitingSheetLink => {
            let Some(user) = lookup_user(&bot, &state, chat_id, telegram_id).await? else {
                return Ok(());
            };
            let importer = SheetImporter::new(state.http.clone());
            match importer.parse(message_text.trim()).await {
                Ok(parsed) => store_parsed(&bot, &state, chat_id, &user, parsed).await,
                Err(e) => {
                    warn!("Spreadsheet import failed for {}: {}", user.id, e);
                    bot.send_message(chat_id, text(user.lang(), Msg::WordsImportError))
                        .await?;
                    Ok(())
                }
            }
        }
        ChatMode::AwaitingNotionLink => {
            let Some(user) = lookup_user(&bot, &state, chat_id, telegram_id).await? else {
                return Ok(());
            };
            let result = match state.config.notion_token.clone() {
                Some(token) => {
                    NotionImporter::new(state.http.clone(), token)
                        .parse(message_text.trim())
                        .await
                }
                None => Err(ImportError::MissingNotionToken),
            };
            match result {
                Ok(parsed) => store_parsed(&bot, &state, chat_id, &user, parsed).await,
                Err(e) => {
                    warn!("Notion import failed for {}: {}", user.id, e);
                    bot.send_message(chat_id, text(user.lang(), Msg::WordsImportError))
                        .await?;
                    Ok(())
                }
            }
        }
        ChatMode::AwaitingCsv => {
            let Some(user) = lookup_user(&bot, &state, chat_id, telegram_id).await? else {
                return Ok(());
            };
            bot.send_message(chat_id, text(user.lang(), Msg::SendCsvFile))
                .await?;
            Ok(())
        }
    }
}

async fn import_csv_document(
    bot: &Bot,
    state: &BotState,
    msg: &Message,
    telegram_id: i64,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let Some(user) = lookup_user(bot, state, chat_id, telegram_id).await? else {
        return Ok(());
    };
    let Some(document) = msg.document() else {
        return Ok(());
    };

    let file = bot.get_file(document.file.id.clone()).await?;
    let mut buf = Cursor::new(Vec::new());
    if let Err(e) = bot.download_file(&file.path, &mut buf).await {
        warn!("Failed to download CSV document for {}: {}", user.id, e);
        bot.send_message(chat_id, text(user.lang(), Msg::WordsImportError))
            .await?;
        return Ok(());
    }

    let content = String::from_utf8_lossy(buf.get_ref());
    let parsed = CsvImporter.parse(&content);
    store_parsed(bot, state, chat_id, &user, parsed).await
}

/// Persists an import result and reports added/skipped counts.
///
/// When nothing valid was parsed the session mode is kept so the user
/// can retry with a corrected input.
async fn store_parsed(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    user: &User,
    parsed: ParsedWords,
) -> ResponseResult<()> {
    let lang = user.lang();

    if parsed.words.is_empty() {
        bot.send_message(chat_id, text(lang, Msg::WordsImportError))
            .reply_markup(menu_keyboard(state, lang, user.telegram_id))
            .await?;
        return Ok(());
    }

    let added = match state.store.add_words(&user.id, &parsed.words).await {
        Ok(added) => added,
        Err(e) => {
            error!("Failed to store words for {}: {}", user.id, e);
            bot.send_message(chat_id, text(lang, Msg::GenericError))
                .await?;
            return Ok(());
        }
    };

    state.sessions.set(chat_id, ChatMode::Idle).await;

    bot.send_message(chat_id, format_words_added(lang, added, &parsed.skipped))
        .reply_markup(menu_keyboard(state, lang, user.telegram_id))
        .await?;

    Ok(())
}
