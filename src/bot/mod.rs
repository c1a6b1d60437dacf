//! Telegram dispatch: commands, callback queries and free-text messages.

mod callbacks;
mod commands;
mod dedup;
mod keyboards;
mod messages;
mod session;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::InlineKeyboardMarkup;
use tokio::sync::Mutex;
use tracing::error;

use crate::config::AppConfig;
use crate::store::{Store, User};
use crate::strings::{Lang, Msg, text};

pub use commands::Command;
pub use dedup::SeenCache;
pub use session::{ChatMode, Sessions};

/// How many processed callback ids the dispatcher remembers.
const CALLBACK_CACHE_CAPACITY: usize = 100;

/// Shared state available to every handler.
pub struct BotState {
    pub config: AppConfig,
    pub store: Store,
    pub http: reqwest::Client,
    pub sessions: Sessions,
    /// Telegram redelivers callback queries; already-processed ids are
    /// answered and dropped.
    pub seen_callbacks: Mutex<SeenCache>,
}

impl BotState {
    #[must_use]
    pub fn new(config: AppConfig, store: Store) -> Self {
        Self {
            config,
            store,
            http: reqwest::Client::new(),
            sessions: Sessions::new(),
            seen_callbacks: Mutex::new(SeenCache::new(CALLBACK_CACHE_CAPACITY)),
        }
    }
}

/// Builds the dptree update handler.
pub fn build_handler() -> UpdateHandler<teloxide::RequestError> {
    let command_handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(commands::handle_command);

    let callback_handler = Update::filter_callback_query().endpoint(callbacks::handle_callback);

    let message_handler = Update::filter_message().endpoint(messages::handle_message);

    dptree::entry()
        .branch(command_handler)
        .branch(callback_handler)
        .branch(message_handler)
}

/// The menu keyboard for this user: operators get the extra stats button.
pub(crate) fn menu_keyboard(state: &BotState, lang: Lang, telegram_id: i64) -> InlineKeyboardMarkup {
    if state.config.is_admin(telegram_id) {
        keyboards::admin_keyboard(lang)
    } else {
        keyboards::main_keyboard(lang)
    }
}

/// Fetches the user record, replying with an explanation when it is
/// missing or the store fails. Handlers bail out on `None`.
pub(crate) async fn lookup_user(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    telegram_id: i64,
) -> ResponseResult<Option<User>> {
    match state.store.user_by_telegram_id(telegram_id).await {
        Ok(Some(user)) => Ok(Some(user)),
        Ok(None) => {
            bot.send_message(chat_id, text(Lang::En, Msg::UserNotFound))
                .await?;
            Ok(None)
        }
        Err(e) => {
            error!("Failed to load user {}: {}", telegram_id, e);
            bot.send_message(chat_id, text(Lang::En, Msg::GenericError))
                .await?;
            Ok(None)
        }
    }
}
