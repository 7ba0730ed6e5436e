//! # LLM Client
//!
//! Provides the `Client` struct, the entry point for LLM interactions.
//! It routes requests to the configured provider and hands back the response text.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::domain::config::LlmConfig;
use crate::domain::traits::LlmProvider;
use crate::infrastructure::llm::providers::{self, ProviderConfig};
use crate::infrastructure::llm::{Error, Provider, Request, Response};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub struct Client {
    provider: Provider,
    config: ProviderConfig,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    http: reqwest::Client,
}

impl Client {
    /// Builds a client from the `llm` section of the configuration.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let provider = Provider::parse(&config.provider)
            .ok_or_else(|| Error::new(&config.provider, "Unknown provider"))?;
        tracing::info!("Using {} for generation", provider.as_str());
        let provider_config = ProviderConfig::from_llm_config(config)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(
                config.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            provider,
            config: provider_config,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            http,
        })
    }

    /// A request for `prompt` carrying the configured sampling settings.
    fn request(&self, prompt: &str) -> Request {
        Request {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..Request::new(prompt)
        }
    }

    /// Send a single prompt to the configured provider
    pub async fn prompt(&self, prompt: &str) -> Result<Response, Error> {
        providers::chat(&self.http, self.provider, &self.config, self.request(prompt)).await
    }
}

#[async_trait]
impl LlmProvider for Client {
    async fn completion(&self, prompt: &str) -> Result<String, String> {
        match self.prompt(prompt).await {
            Ok(response) => {
                tracing::debug!("Completion from {} ({} chars)", response.model, response.content.len());
                Ok(response.content)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Err(e.message)
            }
        }
    }
}
