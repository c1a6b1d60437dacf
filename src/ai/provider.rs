//! Concrete text-generation backends.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{AiError, ProviderKind, build_prompt, parse_sentences};
use crate::store::WordEntry;
use crate::strings::Lang;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TEMPERATURE: f32 = 0.7;

/// A selected backend, ready to generate sentences.
#[derive(Debug, Clone)]
pub enum Provider {
    OpenAi(ChatCompletionProvider),
    DeepSeek(ChatCompletionProvider),
    Gemini(GeminiProvider),
}

impl Provider {
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::OpenAi(_) => ProviderKind::OpenAi,
            Self::DeepSeek(_) => ProviderKind::DeepSeek,
            Self::Gemini(_) => ProviderKind::Gemini,
        }
    }

    /// Generates practice sentences for the given words.
    ///
    /// Returns the parsed sentence lines; the result may be empty when
    /// the backend produced nothing useful (soft failure for callers).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call itself fails.
    pub async fn generate_sentences(
        &self,
        words: &[WordEntry],
        language: Lang,
    ) -> Result<Vec<String>, AiError> {
        let prompt = build_prompt(words, language);
        debug!("Requesting sentences from {}", self.kind());

        let raw = match self {
            Self::OpenAi(p) | Self::DeepSeek(p) => p.complete(&prompt).await?,
            Self::Gemini(p) => p.complete(&prompt).await?,
        };

        Ok(parse_sentences(&raw))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Backend speaking the OpenAI chat-completions protocol.
///
/// DeepSeek exposes the same API under its own base URL.
#[derive(Debug, Clone)]
pub struct ChatCompletionProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionProvider {
    #[must_use]
    pub fn openai(http: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            http,
            base_url: OPENAI_BASE_URL.to_owned(),
            api_key,
            model,
        }
    }

    #[must_use]
    pub fn deepseek(http: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            http,
            base_url: DEEPSEEK_BASE_URL.to_owned(),
            api_key,
            model,
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AiError::Api(status, detail));
        }

        let completion: ChatResponse = response.json().await?;
        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

/// Google Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    #[must_use]
    pub fn new(http: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!(
            "{GEMINI_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AiError::Api(status, detail));
        }

        let data: Value = response.json().await?;
        let text = data
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(text.to_owned())
    }
}
