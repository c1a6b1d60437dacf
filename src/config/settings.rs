//! Application settings loaded from the environment.

use url::Url;

use crate::ai::ProviderKind;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot token.
    pub bot_token: String,

    /// SQLite connection string (e.g. `sqlite://bot.db`).
    pub database_url: String,

    /// Port for the HTTP server (health endpoint and webhook route).
    pub server_port: u16,

    /// Public webhook URL. When absent the bot falls back to long polling.
    pub webhook_url: Option<Url>,

    /// Telegram chat id of the operator. Admin features are disabled when unset.
    pub admin_chat_id: Option<i64>,

    /// Notion integration token for database imports.
    pub notion_token: Option<String>,

    /// How many least-used words go into one practice task.
    pub task_word_count: usize,

    /// AI provider credentials and model names.
    pub ai: AiConfig,
}

/// AI provider configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Preferred provider; others are tried when its key is missing.
    pub default_provider: ProviderKind,

    pub openai_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub gemini_api_key: Option<String>,

    pub openai_model: String,
    pub deepseek_model: String,
    pub gemini_model: String,
}

fn default_port() -> u16 {
    8000
}

fn default_task_word_count() -> usize {
    10
}

impl AppConfig {
    /// Creates configuration from environment variables.
    ///
    /// `TG_BOT_TOKEN` and `DATABASE_URL` are required; everything else has
    /// a default or is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails
    /// to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = require("TG_BOT_TOKEN")?;
        let database_url = require("DATABASE_URL")?;

        let server_port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => default_port(),
        };

        let webhook_url = match std::env::var("WEBHOOK_URL") {
            Ok(raw) => Some(Url::parse(&raw).map_err(|_| ConfigError::InvalidWebhookUrl(raw))?),
            Err(_) => None,
        };

        let admin_chat_id = match std::env::var("ADMIN_CHAT_ID") {
            Ok(raw) => Some(raw.parse().map_err(|_| ConfigError::InvalidAdminId(raw))?),
            Err(_) => None,
        };

        let task_word_count = std::env::var("TASK_WORD_COUNT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_task_word_count);

        Ok(Self {
            bot_token,
            database_url,
            server_port,
            webhook_url,
            admin_chat_id,
            notion_token: optional("NOTION_TOKEN"),
            task_word_count,
            ai: AiConfig::from_env()?,
        })
    }

    /// Checks whether the given Telegram chat id belongs to the operator.
    #[must_use]
    pub fn is_admin(&self, chat_id: i64) -> bool {
        self.admin_chat_id == Some(chat_id)
    }
}

impl AiConfig {
    /// Creates AI configuration from environment variables.
    ///
    /// Provider keys are all optional here; having none of them only
    /// becomes an error when a task is actually requested.
    ///
    /// # Errors
    ///
    /// Returns an error if `DEFAULT_AI_PROVIDER` names an unknown provider.
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_provider = match std::env::var("DEFAULT_AI_PROVIDER") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::UnknownProvider(raw))?,
            Err(_) => ProviderKind::DeepSeek,
        };

        Ok(Self {
            default_provider,
            openai_api_key: optional("OPENAI_API_KEY"),
            deepseek_api_key: optional("DEEPSEEK_API_KEY"),
            gemini_api_key: optional("GEMINI_API_KEY"),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_owned()),
            deepseek_model: std::env::var("DEEPSEEK_MODEL")
                .unwrap_or_else(|_| "deepseek-chat".to_owned()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_owned()),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingEnvVar(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("Invalid WEBHOOK_URL value: {0}")]
    InvalidWebhookUrl(String),

    #[error("Invalid ADMIN_CHAT_ID value: {0}")]
    InvalidAdminId(String),

    #[error("Unknown AI provider: {0}")]
    UnknownProvider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            bot_token: "token".to_owned(),
            database_url: "sqlite::memory:".to_owned(),
            server_port: default_port(),
            webhook_url: None,
            admin_chat_id: Some(42),
            notion_token: None,
            task_word_count: default_task_word_count(),
            ai: AiConfig {
                default_provider: ProviderKind::DeepSeek,
                openai_api_key: None,
                deepseek_api_key: None,
                gemini_api_key: None,
                openai_model: "gpt-4o-mini".to_owned(),
                deepseek_model: "deepseek-chat".to_owned(),
                gemini_model: "gemini-1.5-flash".to_owned(),
            },
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_port(), 8000);
        assert_eq!(default_task_word_count(), 10);
    }

    #[test]
    fn test_is_admin() {
        let config = test_config();
        assert!(config.is_admin(42));
        assert!(!config.is_admin(7));
    }
}
