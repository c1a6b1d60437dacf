//! Sentence generation and usage matching for practice rounds.

use thiserror::Error;
use tracing::info;

use crate::ai::{AiError, select_provider};
use crate::config::AiConfig;
use crate::store::WordEntry;
use crate::strings::Lang;

/// Errors of one generation round.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Ai(#[from] AiError),

    /// The backend call succeeded but produced nothing usable. Callers
    /// must not update word usage in this case.
    #[error("Provider returned no sentences")]
    NoSentences,
}

/// Generates practice sentences for the given words.
///
/// # Errors
///
/// Returns a hard error when no backend has credentials or the call
/// fails, and [`TaskError::NoSentences`] when the output was empty.
pub async fn generate_sentences(
    ai: &AiConfig,
    http: &reqwest::Client,
    words: &[WordEntry],
    language: Lang,
) -> Result<Vec<String>, TaskError> {
    let provider = select_provider(ai, http)?;
    let sentences = provider.generate_sentences(words, language).await?;

    if sentences.is_empty() {
        return Err(TaskError::NoSentences);
    }

    info!(
        "Generated {} sentences with {}",
        sentences.len(),
        provider.kind()
    );
    Ok(sentences)
}

/// Ids of the words whose hanzi actually appears in the generated text.
///
/// Usage is earned only by appearing in output, not merely by being
/// requested.
#[must_use]
pub fn matched_word_ids(words: &[WordEntry], sentences: &[String]) -> Vec<String> {
    words
        .iter()
        .filter(|word| sentences.iter().any(|s| s.contains(&word.hanzi)))
        .map(|word| word.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: &str, hanzi: &str) -> WordEntry {
        WordEntry {
            id: id.to_owned(),
            user_id: "u".to_owned(),
            word: hanzi.to_owned(),
            hanzi: hanzi.to_owned(),
            pinyin: String::new(),
            translation: String::new(),
            times_used: 0,
            last_used_at: None,
        }
    }

    #[test]
    fn test_matches_only_words_in_output() {
        let words = vec![word("a", "你好"), word("b", "谢谢")];
        let sentences = vec!["你好，我是老师。".to_owned()];

        assert_eq!(matched_word_ids(&words, &sentences), vec!["a".to_owned()]);
    }

    #[test]
    fn test_no_sentences_matches_nothing() {
        let words = vec![word("a", "你好")];
        assert!(matched_word_ids(&words, &[]).is_empty());
    }

    #[test]
    fn test_word_found_in_any_sentence() {
        let words = vec![word("a", "谢谢")];
        let sentences = vec!["第一句。".to_owned(), "谢谢你的帮助。".to_owned()];

        assert_eq!(matched_word_ids(&words, &sentences).len(), 1);
    }
}
