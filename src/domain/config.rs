//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the chat service, the language model, and the bot's own settings.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The generative-language backend used for `translate` and `talk`.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>, // e.g. "GENAI_API_KEY"
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: String::new(),
            endpoint: None,
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_api_key_env() -> Option<String> {
    Some("GENAI_API_KEY".to_string())
}

/// Dictionary, admin and command settings.
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_dictionary_path")]
    pub dictionary_path: String,
    #[serde(default)]
    pub admins_path: Option<String>,
    /// Inline admin identities, merged with the admin file.
    #[serde(default)]
    pub admins: Vec<String>,
    #[serde(default = "default_confirm_timeout")]
    pub confirm_timeout_secs: u64,
    #[serde(default = "default_history_lines")]
    pub max_history_lines: usize,
    #[serde(default)]
    pub rate_limits: RateLimitsConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            dictionary_path: default_dictionary_path(),
            admins_path: None,
            admins: Vec::new(),
            confirm_timeout_secs: default_confirm_timeout(),
            max_history_lines: default_history_lines(),
            rate_limits: RateLimitsConfig::default(),
        }
    }
}

impl BotConfig {
    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }
}

fn default_prefix() -> String {
    "*".to_string()
}
fn default_dictionary_path() -> String {
    "data/jamaican_dict.json".to_string()
}
fn default_confirm_timeout() -> u64 {
    15
}
fn default_history_lines() -> usize {
    100
}

/// One limiter per metered command.
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitsConfig {
    #[serde(default = "default_generate_limit")]
    pub translate: RateLimitConfig,
    #[serde(default = "default_generate_limit")]
    pub talk: RateLimitConfig,
    #[serde(default = "default_random_limit")]
    pub random: RateLimitConfig,
}

impl Default for RateLimitsConfig {
    fn default() -> Self {
        Self {
            translate: default_generate_limit(),
            talk: default_generate_limit(),
            random: default_random_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub limit: usize,
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

fn default_generate_limit() -> RateLimitConfig {
    RateLimitConfig {
        limit: 5,
        window_secs: 60,
    }
}

fn default_random_limit() -> RateLimitConfig {
    RateLimitConfig {
        limit: 1,
        window_secs: 5,
    }
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> String {
    "data".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let yaml = r#"
services:
  matrix:
    username: bombo
    password: secret
    homeserver: https://matrix.example.org
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bot.prefix, "*");
        assert_eq!(config.bot.confirm_timeout_secs, 15);
        assert_eq!(config.bot.rate_limits.translate.limit, 5);
        assert_eq!(config.bot.rate_limits.translate.window_secs, 60);
        assert_eq!(config.bot.rate_limits.random.limit, 1);
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.api_key_env.as_deref(), Some("GENAI_API_KEY"));
        assert_eq!(config.system.log_dir, "data");
    }

    #[test]
    fn test_rate_limit_override() {
        let yaml = r#"
services:
  matrix:
    username: bombo
    password: secret
    homeserver: https://matrix.example.org
bot:
  prefix: "!"
  admins: ["@boss:example.org"]
  rate_limits:
    translate:
      limit: 2
      window_secs: 30
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.bot.admins, vec!["@boss:example.org".to_string()]);
        assert_eq!(
            config.bot.rate_limits.translate,
            RateLimitConfig {
                limit: 2,
                window_secs: 30
            }
        );
        // Untouched limiters keep their defaults
        assert_eq!(config.bot.rate_limits.talk.limit, 5);
    }
}
