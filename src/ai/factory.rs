//! Backend selection: a prioritized capability lookup.
//!
//! The configured default provider is tried first, then the remaining
//! backends in a fixed order; the first one with a configured key wins.

use tracing::{debug, warn};

use super::{AiError, ChatCompletionProvider, GeminiProvider, Provider, ProviderKind};
use crate::config::AiConfig;

const FALLBACK_ORDER: [ProviderKind; 3] = [
    ProviderKind::DeepSeek,
    ProviderKind::OpenAi,
    ProviderKind::Gemini,
];

/// Selects the first backend with a configured credential.
///
/// # Errors
///
/// Returns [`AiError::NoCredentials`] when no backend has a key.
pub fn select_provider(config: &AiConfig, http: &reqwest::Client) -> Result<Provider, AiError> {
    for kind in candidates(config.default_provider) {
        let Some(api_key) = credential(config, kind) else {
            continue;
        };

        if kind == config.default_provider {
            debug!("Using AI provider {}", kind);
        } else {
            warn!(
                "AI provider {} has no API key, falling back to {}",
                config.default_provider, kind
            );
        }

        return Ok(build(kind, api_key.to_owned(), config, http.clone()));
    }

    Err(AiError::NoCredentials)
}

fn candidates(default: ProviderKind) -> impl Iterator<Item = ProviderKind> {
    std::iter::once(default).chain(FALLBACK_ORDER.into_iter().filter(move |k| *k != default))
}

fn credential(config: &AiConfig, kind: ProviderKind) -> Option<&str> {
    match kind {
        ProviderKind::OpenAi => config.openai_api_key.as_deref(),
        ProviderKind::DeepSeek => config.deepseek_api_key.as_deref(),
        ProviderKind::Gemini => config.gemini_api_key.as_deref(),
    }
}

fn build(kind: ProviderKind, api_key: String, config: &AiConfig, http: reqwest::Client) -> Provider {
    match kind {
        ProviderKind::OpenAi => Provider::OpenAi(ChatCompletionProvider::openai(
            http,
            api_key,
            config.openai_model.clone(),
        )),
        ProviderKind::DeepSeek => Provider::DeepSeek(ChatCompletionProvider::deepseek(
            http,
            api_key,
            config.deepseek_model.clone(),
        )),
        ProviderKind::Gemini => Provider::Gemini(GeminiProvider::new(
            http,
            api_key,
            config.gemini_model.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(
        default: ProviderKind,
        openai: Option<&str>,
        deepseek: Option<&str>,
        gemini: Option<&str>,
    ) -> AiConfig {
        AiConfig {
            default_provider: default,
            openai_api_key: openai.map(str::to_owned),
            deepseek_api_key: deepseek.map(str::to_owned),
            gemini_api_key: gemini.map(str::to_owned),
            openai_model: "gpt-4o-mini".to_owned(),
            deepseek_model: "deepseek-chat".to_owned(),
            gemini_model: "gemini-1.5-flash".to_owned(),
        }
    }

    #[test]
    fn test_default_provider_wins_when_configured() {
        let http = reqwest::Client::new();
        let cfg = config(ProviderKind::Gemini, Some("o"), Some("d"), Some("g"));

        let provider = select_provider(&cfg, &http).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Gemini);
    }

    #[test]
    fn test_falls_back_when_default_key_missing() {
        let http = reqwest::Client::new();
        let cfg = config(ProviderKind::OpenAi, None, Some("d"), Some("g"));

        let provider = select_provider(&cfg, &http).unwrap();
        assert_eq!(provider.kind(), ProviderKind::DeepSeek);
    }

    #[test]
    fn test_last_resort_backend() {
        let http = reqwest::Client::new();
        let cfg = config(ProviderKind::DeepSeek, None, None, Some("g"));

        let provider = select_provider(&cfg, &http).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Gemini);
    }

    #[test]
    fn test_no_credentials_is_hard_error() {
        let http = reqwest::Client::new();
        let cfg = config(ProviderKind::DeepSeek, None, None, None);

        assert!(matches!(
            select_provider(&cfg, &http),
            Err(AiError::NoCredentials)
        ));
    }
}
