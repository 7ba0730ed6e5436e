//! OpenAI-compatible chat completions (OpenAI, Groq, xAI).

use serde::{Deserialize, Serialize};

use super::{ProviderConfig, status_error};
use crate::infrastructure::llm::{Error, Request, Response};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn completion_text(response: CompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
}

pub async fn chat(
    http: &reqwest::Client,
    provider: &str,
    base_url: &str,
    config: &ProviderConfig,
    request: Request,
) -> Result<Response, Error> {
    let model = config.model(DEFAULT_MODEL);
    let body = CompletionRequest {
        model: &model,
        messages: [ChatMessage {
            role: "user",
            content: &request.prompt,
        }],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    };

    let response = http
        .post(format!("{base_url}/chat/completions"))
        .bearer_auth(&config.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::new(provider, format!("HTTP request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(status_error(provider, response).await);
    }

    let parsed: CompletionResponse = response
        .json()
        .await
        .map_err(|e| Error::new(provider, format!("Failed to parse response: {}", e)))?;

    let served_by = parsed.model.clone().unwrap_or_else(|| model.clone());
    let content =
        completion_text(parsed).ok_or_else(|| Error::new(provider, "No choices in response"))?;

    Ok(Response {
        content,
        model: served_by,
    })
}
