//! Vocabulary entries, usage tracking and least-used selection.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Store, StoreError};

/// A stored vocabulary entry owned by exactly one user.
#[derive(Debug, Clone, FromRow)]
pub struct WordEntry {
    /// Unique id (UUID).
    pub id: String,

    /// Internal id of the owning user.
    pub user_id: String,

    /// Display word. Canonically equal to `hanzi`.
    pub word: String,

    /// Chinese characters. Always non-empty.
    pub hanzi: String,

    /// Pinyin transcription. May be empty for formats that omit it.
    pub pinyin: String,

    /// Translation into the user's language. May be empty.
    pub translation: String,

    /// How many times the word appeared in generated tasks.
    pub times_used: i64,

    /// When the word last appeared in a task. Absent until first use.
    pub last_used_at: Option<DateTime<Utc>>,
}

impl WordEntry {
    /// `hanzi (pinyin) - translation` line used in statistics.
    #[must_use]
    pub fn display_line(&self) -> String {
        format!("{} ({}) - {}", self.hanzi, self.pinyin, self.translation)
    }
}

/// A validated entry produced by an import parser, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWord {
    pub word: String,
    pub hanzi: String,
    pub pinyin: String,
    pub translation: String,
}

/// Per-user word statistics.
#[derive(Debug, Clone)]
pub struct WordStats {
    pub total: usize,
    pub used: usize,
    pub unused: usize,
    /// Top 5 most used words as `(display line, times used)`.
    pub top_words: Vec<(String, i64)>,
}

/// Global statistics for the operator.
#[derive(Debug, Clone)]
pub struct GlobalStats {
    pub users_count: i64,
    pub words_count: i64,
    pub avg_words_per_user: i64,
}

/// Orders words for practice: fewest uses first, then oldest use first,
/// with never-used words ahead of any used one. The sort is stable so
/// ties keep their input order.
#[must_use]
pub fn select_least_used(mut words: Vec<WordEntry>, limit: usize) -> Vec<WordEntry> {
    words.sort_by(|a, b| {
        (a.times_used, a.last_used_at).cmp(&(b.times_used, b.last_used_at))
    });
    words.truncate(limit);
    words
}

impl Store {
    /// Persists a batch of parsed entries for a user in one transaction.
    ///
    /// Each entry gets a fresh UUID and a zero usage counter. Returns the
    /// number of entries written.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; nothing is written then.
    pub async fn add_words(&self, user_id: &str, entries: &[NewWord]) -> Result<usize, StoreError> {
        let mut tx = self.pool().begin().await?;

        for entry in entries {
            sqlx::query(
                "INSERT INTO words (id, user_id, word, hanzi, pinyin, translation, times_used)
                 VALUES (?, ?, ?, ?, ?, ?, 0)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(&entry.word)
            .bind(&entry.hanzi)
            .bind(&entry.pinyin)
            .bind(&entry.translation)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Added {} words for user {}", entries.len(), user_id);
        Ok(entries.len())
    }

    /// Returns all entries for a user. Order is not guaranteed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn user_words(&self, user_id: &str) -> Result<Vec<WordEntry>, StoreError> {
        let words = sqlx::query_as::<_, WordEntry>(
            "SELECT id, user_id, word, hanzi, pinyin, translation, times_used, last_used_at
             FROM words WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        debug!("Retrieved {} words for user {}", words.len(), user_id);
        Ok(words)
    }

    /// Number of stored entries for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn word_count(&self, user_id: &str) -> Result<i64, StoreError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM words WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(self.pool())
                .await?;

        Ok(count)
    }

    /// The user's `limit` least-practiced words. Read-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn least_used_words(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<WordEntry>, StoreError> {
        let words = self.user_words(user_id).await?;
        Ok(select_least_used(words, limit))
    }

    /// Increments usage counters and refreshes timestamps for the given
    /// word ids in one transaction. Ids that no longer exist are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; no counter moves then.
    pub async fn update_words_usage(
        &self,
        user_id: &str,
        word_ids: &[String],
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut tx = self.pool().begin().await?;

        for word_id in word_ids {
            sqlx::query(
                "UPDATE words SET times_used = times_used + 1, last_used_at = ?
                 WHERE id = ? AND user_id = ?",
            )
            .bind(now)
            .bind(word_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Updated usage for {} words of user {}", word_ids.len(), user_id);
        Ok(())
    }

    /// Deletes every entry of a user in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn reset_words(&self, user_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM words WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool())
            .await?;

        info!("Reset all words for user {}", user_id);
        Ok(())
    }

    /// Per-user usage statistics for `/stats`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn word_stats(&self, user_id: &str) -> Result<WordStats, StoreError> {
        let mut words = self.user_words(user_id).await?;

        let total = words.len();
        let used = words.iter().filter(|w| w.times_used > 0).count();

        words.sort_by(|a, b| b.times_used.cmp(&a.times_used));
        let top_words = words
            .iter()
            .take(5)
            .map(|w| (w.display_line(), w.times_used))
            .collect();

        Ok(WordStats {
            total,
            used,
            unused: total - used,
            top_words,
        })
    }

    /// Fleet-wide statistics for the operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn global_stats(&self) -> Result<GlobalStats, StoreError> {
        let (users_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;

        let (words_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM words")
            .fetch_one(self.pool())
            .await?;

        let avg_words_per_user = if users_count > 0 {
            (words_count as f64 / users_count as f64).round() as i64
        } else {
            0
        };

        Ok(GlobalStats {
            users_count,
            words_count,
            avg_words_per_user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::Lang;

    fn entry(word: &str) -> NewWord {
        NewWord {
            word: word.to_owned(),
            hanzi: word.to_owned(),
            pinyin: String::new(),
            translation: String::new(),
        }
    }

    async fn store_with_user() -> (Store, String) {
        let store = Store::open_in_memory().await.unwrap();
        let user = store.upsert_user(1, None, Lang::En).await.unwrap();
        (store, user.id)
    }

    #[tokio::test]
    async fn test_add_words_updates_count() {
        let (store, user_id) = store_with_user().await;

        assert_eq!(store.word_count(&user_id).await.unwrap(), 0);

        let added = store
            .add_words(&user_id, &[entry("你好"), entry("谢谢")])
            .await
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(store.word_count(&user_id).await.unwrap(), 2);
        assert_eq!(store.user_words(&user_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_words() {
        let (store, user_id) = store_with_user().await;
        store.add_words(&user_id, &[entry("你好")]).await.unwrap();

        store.reset_words(&user_id).await.unwrap();

        assert_eq!(store.word_count(&user_id).await.unwrap(), 0);
        assert!(store.user_words(&user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_usage_touches_only_listed_ids() {
        let (store, user_id) = store_with_user().await;
        store
            .add_words(&user_id, &[entry("你好"), entry("谢谢")])
            .await
            .unwrap();

        let words = store.user_words(&user_id).await.unwrap();
        let target = words.iter().find(|w| w.hanzi == "你好").unwrap();
        let before = Utc::now();

        store
            .update_words_usage(&user_id, &[target.id.clone()])
            .await
            .unwrap();

        let after = store.user_words(&user_id).await.unwrap();
        let bumped = after.iter().find(|w| w.id == target.id).unwrap();
        let untouched = after.iter().find(|w| w.hanzi == "谢谢").unwrap();

        assert_eq!(bumped.times_used, 1);
        assert!(bumped.last_used_at.is_some_and(|t| t >= before));
        assert_eq!(untouched.times_used, 0);
        assert!(untouched.last_used_at.is_none());
    }

    #[tokio::test]
    async fn test_update_usage_skips_missing_ids() {
        let (store, user_id) = store_with_user().await;
        store.add_words(&user_id, &[entry("你好")]).await.unwrap();

        store
            .update_words_usage(&user_id, &["no-such-id".to_owned()])
            .await
            .unwrap();

        let words = store.user_words(&user_id).await.unwrap();
        assert_eq!(words[0].times_used, 0);
    }

    #[tokio::test]
    async fn test_least_used_prefers_lower_counter() {
        let (store, user_id) = store_with_user().await;
        store
            .add_words(&user_id, &[entry("你好"), entry("谢谢")])
            .await
            .unwrap();

        let words = store.user_words(&user_id).await.unwrap();
        let thanks = words.iter().find(|w| w.hanzi == "谢谢").unwrap();
        for _ in 0..3 {
            store
                .update_words_usage(&user_id, &[thanks.id.clone()])
                .await
                .unwrap();
        }

        let selected = store.least_used_words(&user_id, 1).await.unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].hanzi, "你好");
    }

    #[tokio::test]
    async fn test_least_used_is_idempotent() {
        let (store, user_id) = store_with_user().await;
        store
            .add_words(&user_id, &[entry("一"), entry("二"), entry("三")])
            .await
            .unwrap();

        let first: Vec<String> = store
            .least_used_words(&user_id, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.id)
            .collect();
        let second: Vec<String> = store
            .least_used_words(&user_id, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.id)
            .collect();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_word_stats() {
        let (store, user_id) = store_with_user().await;
        store
            .add_words(&user_id, &[entry("你好"), entry("谢谢")])
            .await
            .unwrap();

        let words = store.user_words(&user_id).await.unwrap();
        store
            .update_words_usage(&user_id, &[words[0].id.clone()])
            .await
            .unwrap();

        let stats = store.word_stats(&user_id).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.used, 1);
        assert_eq!(stats.unused, 1);
        assert_eq!(stats.top_words.len(), 2);
        assert_eq!(stats.top_words[0].1, 1);
    }

    #[tokio::test]
    async fn test_global_stats() {
        let store = Store::open_in_memory().await.unwrap();
        let a = store.upsert_user(1, None, Lang::En).await.unwrap();
        let b = store.upsert_user(2, None, Lang::En).await.unwrap();

        store
            .add_words(&a.id, &[entry("一"), entry("二"), entry("三")])
            .await
            .unwrap();
        store.add_words(&b.id, &[entry("四")]).await.unwrap();

        let stats = store.global_stats().await.unwrap();
        assert_eq!(stats.users_count, 2);
        assert_eq!(stats.words_count, 4);
        assert_eq!(stats.avg_words_per_user, 2);
    }

    #[test]
    fn test_select_never_used_before_stale() {
        let mk = |hanzi: &str, times: i64, used: Option<DateTime<Utc>>| WordEntry {
            id: hanzi.to_owned(),
            user_id: "u".to_owned(),
            word: hanzi.to_owned(),
            hanzi: hanzi.to_owned(),
            pinyin: String::new(),
            translation: String::new(),
            times_used: times,
            last_used_at: used,
        };

        let stale = Utc::now();
        let words = vec![
            mk("旧", 1, Some(stale)),
            mk("新", 1, None),
            mk("多", 3, None),
        ];

        let selected = select_least_used(words, 2);
        let order: Vec<&str> = selected.iter().map(|w| w.hanzi.as_str()).collect();
        // Same counter: never-used sorts before used-but-stale.
        assert_eq!(order, vec!["新", "旧"]);
    }
}
