//! LLM Wire Types & Request Building
//!
//! Chat-completion request/response types for OpenAI-compatible endpoints,
//! plus the client that sends them and the startup tool-id registry.

pub mod client;
pub mod tools;

pub use client::{CompletionClient, CompletionError};
pub use tools::ToolRegistry;

use serde::{Deserialize, Serialize};

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of conversation as sent on the wire: `{role, name, content}`.
/// Immutable once created; duplicates are allowed in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    /// Display name of the speaker (Discord username or the bot's name).
    pub name: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(name: impl Into<String>, content: String) -> Self {
        Self {
            role: Role::User,
            name: name.into(),
            content,
        }
    }

    pub fn assistant(name: impl Into<String>, content: String) -> Self {
        Self {
            role: Role::Assistant,
            name: name.into(),
            content,
        }
    }
}

/// Tool selection strategy. Only `auto` is ever sent: the model decides
/// when to use the attached tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
}

/// Outbound chat-completion request.
///
/// `tool_ids` and `tool_choice` are either both present or both absent —
/// they are omitted from the JSON entirely (not sent empty or null) so the
/// remote API's default tool-selection behavior is preserved.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl CompletionRequest {
    /// Assemble a request from a history snapshot and the current tool ids.
    /// Pure: the messages list is the snapshot verbatim, in order.
    pub fn build(
        messages: Vec<ChatTurn>,
        tool_ids: Vec<String>,
        model: &str,
        max_tokens: u32,
    ) -> Self {
        let (tool_ids, tool_choice) = if tool_ids.is_empty() {
            (None, None)
        } else {
            (Some(tool_ids), Some(ToolChoice::Auto))
        };

        Self {
            model: model.to_string(),
            messages,
            max_tokens,
            tool_ids,
            tool_choice,
        }
    }
}
