//! User records: created on first contact, never deleted.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::strings::Lang;

/// A registered bot user.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Internal id (UUID).
    pub id: String,

    /// Telegram chat/user id.
    pub telegram_id: i64,

    /// Telegram username, if the user has one.
    pub username: Option<String>,

    /// Preferred interface language code.
    pub language: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The user's interface language, falling back to English for
    /// values written by older builds.
    #[must_use]
    pub fn lang(&self) -> Lang {
        self.language.parse().unwrap_or(Lang::En)
    }
}

impl Store {
    /// Creates the user on first contact, or refreshes the username on
    /// repeat `/start`. The stored language is only set on insert; an
    /// existing user's choice is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn upsert_user(
        &self,
        telegram_id: i64,
        username: Option<&str>,
        detected_lang: Lang,
    ) -> Result<User, StoreError> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, telegram_id, username, language, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(telegram_id) DO UPDATE SET
                 username = excluded.username,
                 updated_at = excluded.updated_at
             RETURNING id, telegram_id, username, language, created_at, updated_at",
        )
        .bind(&id)
        .bind(telegram_id)
        .bind(username)
        .bind(detected_lang.code())
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        debug!("Upserted user {} (telegram_id={})", user.id, telegram_id);
        Ok(user)
    }

    /// Looks up a user by Telegram id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn user_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, telegram_id, username, language, created_at, updated_at
             FROM users WHERE telegram_id = ?",
        )
        .bind(telegram_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    /// Updates the user's interface language.
    ///
    /// Returns the updated record, or `None` if the user is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn update_user_language(
        &self,
        telegram_id: i64,
        language: Lang,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET language = ?, updated_at = ?
             WHERE telegram_id = ?
             RETURNING id, telegram_id, username, language, created_at, updated_at",
        )
        .bind(language.code())
        .bind(Utc::now())
        .bind(telegram_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_creates_then_keeps_language() {
        let store = Store::open_in_memory().await.unwrap();

        let created = store
            .upsert_user(100, Some("alice"), Lang::Ru)
            .await
            .unwrap();
        assert_eq!(created.telegram_id, 100);
        assert_eq!(created.lang(), Lang::Ru);

        // A repeat /start with a different detected language must not
        // override the stored choice.
        let again = store
            .upsert_user(100, Some("alice_renamed"), Lang::De)
            .await
            .unwrap();
        assert_eq!(again.id, created.id);
        assert_eq!(again.lang(), Lang::Ru);
        assert_eq!(again.username.as_deref(), Some("alice_renamed"));
    }

    #[tokio::test]
    async fn test_lookup_missing_user() {
        let store = Store::open_in_memory().await.unwrap();
        assert!(store.user_by_telegram_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_language() {
        let store = Store::open_in_memory().await.unwrap();
        store.upsert_user(5, None, Lang::En).await.unwrap();

        let updated = store.update_user_language(5, Lang::Zh).await.unwrap();
        assert_eq!(updated.map(|u| u.lang()), Some(Lang::Zh));

        let missing = store.update_user_language(6, Lang::Zh).await.unwrap();
        assert!(missing.is_none());
    }
}
