//! Completion Client
//!
//! Sends chat-completion requests to an OpenAI-compatible endpoint and maps
//! the response (or failure) into a normalized result. One attempt per
//! invocation: no retries, no request deadline — a hung remote stalls that
//! one flow only.

use super::CompletionRequest;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Failure modes of a completion call. `Display` is chat-surface ready:
/// the handler forwards it verbatim in the error reply.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Remote returned a non-success status; body captured verbatim.
    #[error("{status} - {body}")]
    Api { status: u16, body: String },

    /// Network-level failure (connection refused, DNS, protocol error).
    /// No HTTP status exists; the error's descriptive text stands in.
    #[error("{0}")]
    Transport(String),

    /// 2xx response whose body did not have the expected shape.
    #[error("unexpected completion response: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

// `content` is required: a choice without it is a malformed response, not
// an empty reply.
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// HTTP client for the completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    completion_url: String,
    api_key: Option<String>,
}

impl CompletionClient {
    pub fn new(completion_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            completion_url,
            api_key,
        }
    }

    /// POST the request and extract the first choice's message content.
    ///
    /// Bearer auth is attached only when an API key is configured; with no
    /// key the `Authorization` header is absent entirely.
    pub async fn send(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        tracing::info!(
            "Completion request: model={}, messages={}, max_tokens={}",
            request.model,
            request.messages.len(),
            request.max_tokens
        );

        let mut http_request = self
            .client
            .post(&self.completion_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(request);

        if let Some(ref key) = self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Completion response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Completion API error: {} - {}", status, body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Malformed("response contained no choices".to_string()))
    }
}
