//! Gemini provider
//!
//! Calls Google's `generateContent` endpoint with a single-turn prompt.
//! A response with no text (e.g. blocked by safety filters) is reported as an error.

use serde::{Deserialize, Serialize};

use super::{ProviderConfig, status_error};
use crate::infrastructure::llm::{Error, Request, Response};

const PROVIDER: &str = "gemini";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini API request format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Gemini content (message)
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

fn request_body(request: &Request) -> GeminiRequest {
    let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
        Some(GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        })
    } else {
        None
    };

    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: request.prompt.clone(),
            }],
        }],
        generation_config,
    }
}

fn response_text(response: GeminiResponse) -> Result<String, Error> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::new(PROVIDER, "No candidates in response"))?;

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::new(PROVIDER, "Empty response (possibly blocked)"));
    }
    Ok(text)
}

/// Execute a generation request using Gemini's API
pub async fn chat(
    http: &reqwest::Client,
    base_url: &str,
    config: &ProviderConfig,
    request: Request,
) -> Result<Response, Error> {
    let model = config.model(DEFAULT_MODEL);
    let url = format!("{base_url}/v1beta/models/{model}:generateContent");

    let response = http
        .post(&url)
        .header("x-goog-api-key", &config.api_key)
        .json(&request_body(&request))
        .send()
        .await
        .map_err(|e| Error::new(PROVIDER, format!("HTTP request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(status_error(PROVIDER, response).await);
    }

    let gemini_response: GeminiResponse = response
        .json()
        .await
        .map_err(|e| Error::new(PROVIDER, format!("Failed to parse response: {}", e)))?;

    Ok(Response {
        content: response_text(gemini_response)?,
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(request_body(&Request::new("hello"))).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_sampling_settings_become_generation_config() {
        let request = Request {
            temperature: Some(0.7),
            max_tokens: Some(256),
            ..Request::new("hello")
        };
        let body = serde_json::to_value(request_body(&request)).unwrap();
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert!(body["generationConfig"]["temperature"].as_f64().is_some());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Wah gwaan"}, {"text": "bredren"}]},
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response_text(parsed).unwrap(), "Wah gwaan\nbredren");
    }

    #[test]
    fn test_blocked_response_is_an_error() {
        let parsed: GeminiResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(response_text(parsed).is_err());

        let parsed: GeminiResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response_text(parsed).is_err());
    }
}
