//! AI sentence generation over interchangeable text-completion backends.
//!
//! OpenAI and DeepSeek speak the same chat-completions protocol; Gemini
//! has its own shape. Provider selection walks an ordered candidate list
//! and picks the first backend with a configured credential.

mod factory;
mod provider;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::store::WordEntry;
use crate::strings::Lang;

pub use factory::select_provider;
pub use provider::{ChatCompletionProvider, GeminiProvider, Provider};

/// Identifier of a text-generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    DeepSeek,
    Gemini,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown provider name.
#[derive(Debug, Error)]
#[error("unknown AI provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "deepseek" => Ok(Self::DeepSeek),
            "gemini" => Ok(Self::Gemini),
            other => Err(UnknownProvider(other.to_owned())),
        }
    }
}

/// Errors from the AI layer.
#[derive(Debug, Error)]
pub enum AiError {
    /// No backend has a configured API key. Hard error.
    #[error("No AI provider has a configured API key")]
    NoCredentials,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {0}: {1}")]
    Api(reqwest::StatusCode, String),
}

/// Builds the generation prompt embedding the target words and language.
#[must_use]
pub fn build_prompt(words: &[WordEntry], language: Lang) -> String {
    let word_list: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();

    format!(
        "Come up with 3 short meaningful sentences in {lang}, using the words: {list}. \
         Return ONLY the text in {lang}, without translation or extra commentary. \
         Format: one sentence per line.",
        lang = language.english_name(),
        list = word_list.join(", "),
    )
}

/// Splits a raw completion into sentence lines, dropping blanks.
#[must_use]
pub fn parse_sentences(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(hanzi: &str) -> WordEntry {
        WordEntry {
            id: hanzi.to_owned(),
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
    fn test_prompt_embeds_words_and_language() {
        let prompt = build_prompt(&[word("你好"), word("谢谢")], Lang::Ru);
        assert!(prompt.contains("你好, 谢谢"));
        assert!(prompt.contains("Russian"));
    }

    #[test]
    fn test_parse_sentences_drops_blank_lines() {
        let sentences = parse_sentences("第一句。\n\n  第二句。  \n");
        assert_eq!(sentences, vec!["第一句。".to_owned(), "第二句。".to_owned()]);
    }

    #[test]
    fn test_parse_sentences_empty_input() {
        assert!(parse_sentences("").is_empty());
        assert!(parse_sentences("  \n \n").is_empty());
    }

    #[test]
    fn test_provider_kind_round_trip() {
        for kind in [ProviderKind::OpenAi, ProviderKind::DeepSeek, ProviderKind::Gemini] {
            assert_eq!(kind.as_str().parse::<ProviderKind>().ok(), Some(kind));
        }
    }
}
