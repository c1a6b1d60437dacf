//! Per-chat session mode: decides how free-form input is interpreted.

use std::collections::HashMap;

use teloxide::types::ChatId;
use tokio::sync::RwLock;

/// What the bot expects next from a chat.
///
/// Transitions: picking an import source moves the chat into the
/// matching awaiting state; any handled input (and every command) moves
/// it back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatMode {
    #[default]
    Idle,
    AwaitingWords,
    AwaitingCsv,
    AwaitingSheetLink,
    AwaitingNotionLink,
}

/// Short-lived per-chat session storage.
#[derive(Debug, Default)]
pub struct Sessions {
    modes: RwLock<HashMap<ChatId, ChatMode>>,
}

impl Sessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode of a chat, `Idle` when unknown.
    pub async fn mode(&self, chat_id: ChatId) -> ChatMode {
        self.modes
            .read()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }

    /// Sets the mode of a chat.
    pub async fn set(&self, chat_id: ChatId, mode: ChatMode) {
        self.modes.write().await.insert(chat_id, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_chat_is_idle() {
        let sessions = Sessions::new();
        assert_eq!(sessions.mode(ChatId(1)).await, ChatMode::Idle);
    }

    #[tokio::test]
    async fn test_mode_round_trip() {
        let sessions = Sessions::new();
        sessions.set(ChatId(1), ChatMode::AwaitingWords).await;

        assert_eq!(sessions.mode(ChatId(1)).await, ChatMode::AwaitingWords);
        // Other chats are unaffected.
        assert_eq!(sessions.mode(ChatId(2)).await, ChatMode::Idle);

        sessions.set(ChatId(1), ChatMode::Idle).await;
        assert_eq!(sessions.mode(ChatId(1)).await, ChatMode::Idle);
    }
}
