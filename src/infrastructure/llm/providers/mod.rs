//! # LLM Providers
//!
//! Contains implementations for specific LLM providers:
//! - Gemini (the default, Google's generative language API)
//! - OpenAI-compatible APIs (OpenAI, Groq, xAI)

mod gemini;
mod openai;

use crate::domain::config::LlmConfig;
use crate::infrastructure::llm::{Error, Provider, Request, Response};

/// Configuration for a provider
pub struct ProviderConfig {
    /// API key
    pub api_key: String,
    /// Base URL (for non-default endpoints)
    pub base_url: Option<String>,
    /// Default model
    pub default_model: String,
}

impl ProviderConfig {
    pub fn from_llm_config(config: &LlmConfig) -> Result<Self, Error> {
        let api_key = if let Some(key) = &config.api_key {
            key.clone()
        } else if let Some(env_var) = &config.api_key_env {
            std::env::var(env_var).map_err(|e| {
                Error::new(
                    &config.provider,
                    format!("API key env var {} not set: {}", env_var, e),
                )
            })?
        } else {
            return Err(Error::new(
                &config.provider,
                "No API key provided - set api_key or api_key_env",
            ));
        };

        Ok(Self {
            api_key,
            base_url: config.endpoint.clone(),
            default_model: config.model.clone(),
        })
    }

    /// The configured endpoint, or the provider's public API.
    fn base_url(&self, provider: Provider) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(provider.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// The configured model, else the provider's `fallback`.
    fn model(&self, fallback: &str) -> String {
        if self.default_model.is_empty() {
            fallback.to_string()
        } else {
            self.default_model.clone()
        }
    }
}

/// Execute a generation request with the specified provider
pub async fn chat(
    http: &reqwest::Client,
    provider: Provider,
    config: &ProviderConfig,
    request: Request,
) -> Result<Response, Error> {
    let base_url = config.base_url(provider);
    match provider {
        Provider::Gemini => gemini::chat(http, &base_url, config, request).await,
        // Groq and xAI speak the OpenAI wire format
        Provider::OpenAI | Provider::Groq | Provider::XAI => {
            openai::chat(http, provider.as_str(), &base_url, config, request).await
        }
    }
}

/// Turns a non-success HTTP response into an `Error`, preferring the API's own message.
async fn status_error(provider: &str, response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    match error_message(&body) {
        Some(msg) => Error::new(provider, msg),
        None => Error::new(provider, format!("HTTP {}: {}", status, body)),
    }
}

/// Pulls `error.message` out of a provider's JSON error body, if present.
fn error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_api_key_wins() {
        let config = LlmConfig {
            api_key: Some("inline".to_string()),
            api_key_env: Some("BOMBOCORD_TEST_UNSET_KEY".to_string()),
            endpoint: Some("http://localhost:9999".to_string()),
            model: "gemini-2.0-flash".to_string(),
            ..LlmConfig::default()
        };
        let pc = ProviderConfig::from_llm_config(&config).unwrap();
        assert_eq!(pc.api_key, "inline");
        assert_eq!(pc.base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(pc.default_model, "gemini-2.0-flash");
    }

    #[test]
    fn test_missing_env_key_is_an_error() {
        let config = LlmConfig {
            api_key: None,
            api_key_env: Some("BOMBOCORD_TEST_UNSET_KEY".to_string()),
            ..LlmConfig::default()
        };
        let err = ProviderConfig::from_llm_config(&config).err().unwrap();
        assert!(err.message.contains("BOMBOCORD_TEST_UNSET_KEY"));

        let config = LlmConfig {
            api_key: None,
            api_key_env: None,
            ..LlmConfig::default()
        };
        assert!(ProviderConfig::from_llm_config(&config).is_err());
    }

    #[test]
    fn test_endpoint_overrides_default_base_url() {
        let mut pc = ProviderConfig {
            api_key: "k".into(),
            base_url: None,
            default_model: String::new(),
        };
        assert_eq!(pc.base_url(Provider::Groq), "https://api.groq.com/openai/v1");

        pc.base_url = Some("http://proxy/".into());
        assert_eq!(pc.base_url(Provider::Groq), "http://proxy");
    }

    #[test]
    fn test_configured_model_overrides_fallback() {
        let mut pc = ProviderConfig {
            api_key: "k".into(),
            base_url: None,
            default_model: String::new(),
        };
        assert_eq!(pc.model("gpt-4o-mini"), "gpt-4o-mini");
        pc.default_model = "llama-3.1-8b-instant".into();
        assert_eq!(pc.model("gpt-4o-mini"), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error": {"message": "API key not valid", "code": 400}}"#),
            Some("API key not valid".to_string())
        );
        assert_eq!(error_message("<html>bad gateway</html>"), None);
    }
}
