//! Anthropic client for recipe text generation

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ANTHROPIC_MESSAGES_URL, ANTHROPIC_VERSION, PROVIDER_TIMEOUT_SECS, TEXT_MAX_TOKENS,
};
use crate::error::SaucierError;

/// Seam for the text-generation provider so tests can swap in a mock.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends the compiled prompt and returns the raw free-text reply.
    async fn complete(&self, prompt: &str) -> Result<String, SaucierError>;
}

/// Anthropic messages API client.
#[derive(Debug)]
pub struct ClaudeClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl ClaudeClient {
    /// Creates a client for the given key and model. The HTTP timeout is
    /// well above a normal API budget because generation takes tens of
    /// seconds.
    pub fn new(api_key: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            api_key,
            model,
            client,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// Classifies a provider failure, checked in order: rate-limit signal,
/// then model/not-found signal, then generic connection failure.
fn classify_failure(status: Option<u16>, detail: &str, model: &str) -> SaucierError {
    let lowered = detail.to_ascii_lowercase();
    if status == Some(429) || lowered.contains("429") || lowered.contains("rate limit") {
        return SaucierError::RateLimited;
    }
    if status == Some(404) || lowered.contains("404") || lowered.contains("model") {
        return SaucierError::ProviderConfig(format!(
            "model '{model}' not found or not accessible: {detail}"
        ));
    }
    SaucierError::ProviderConnection(detail.to_string())
}

#[async_trait]
impl TextGenerator for ClaudeClient {
    async fn complete(&self, prompt: &str) -> Result<String, SaucierError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: TEXT_MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|err| classify_failure(None, &err.to_string(), &self.model))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| SaucierError::ProviderConnection(err.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(classify_failure(Some(status), &body, &self.model));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body)
            .map_err(|err| SaucierError::ProviderConnection(err.to_string()))?;

        let mut reply = String::new();
        for block in parsed.content {
            if block.block_type == "text"
                && let Some(text) = block.text
            {
                reply.push_str(&text);
            }
        }

        if reply.is_empty() {
            return Err(SaucierError::EmptyReply);
        }

        Ok(reply)
    }
}
