//! Mention Relay Core
//!
//! Platform-independent orchestration for one mention: admission (self
//! guard, single-slot dedup, mention gate), the history/request/completion
//! exchange, and the history reset. The Discord layer stays a thin adapter
//! over this type so the whole flow is testable without a gateway
//! connection.

use crate::config::Config;
use crate::history::HistoryBuffer;
use crate::llm::{ChatTurn, CompletionClient, CompletionError, CompletionRequest, ToolRegistry};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Fixed reply for mentions that carry no content once the mention token is
/// stripped.
pub const EMPTY_CONTENT_REPLY: &str = "Whaaa?";

/// Orchestrates mention handling against the shared conversation history.
///
/// History and the last-processed-id slot are mutex-guarded: the platform
/// may dispatch events concurrently, and both admission decisions and
/// append ordering must be serialized.
pub struct MentionRelay {
    history: Mutex<HistoryBuffer>,
    /// Single-slot dedup guard: holds exactly one prior event id, so only
    /// immediately re-delivered duplicates are caught. Intentionally weak.
    last_processed: Mutex<Option<u64>>,
    tools: Arc<ToolRegistry>,
    client: CompletionClient,
    model: String,
    max_tokens: u32,
}

impl MentionRelay {
    pub fn new(config: &Config, tools: Arc<ToolRegistry>) -> Self {
        Self {
            history: Mutex::new(HistoryBuffer::new(config.max_history_length)),
            last_processed: Mutex::new(None),
            tools,
            client: CompletionClient::new(config.completion_url(), config.api_key.clone()),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Decide whether an event enters the relay flow, and record its id if
    /// it does. One serialized decision per event:
    ///
    /// 1. events authored by the bot itself are rejected;
    /// 2. an id equal to the most recently processed one is rejected;
    /// 3. events that do not mention the bot are rejected silently;
    /// 4. otherwise the id is recorded *before* any further work, so a
    ///    redelivery arriving mid-flight is still rejected.
    pub async fn admit(&self, event_id: u64, author_id: u64, bot_id: u64, mentioned: bool) -> bool {
        if author_id == bot_id {
            return false;
        }

        let mut last = self.last_processed.lock().await;
        if *last == Some(event_id) {
            tracing::debug!("Skipping re-delivered event {}", event_id);
            return false;
        }
        if !mentioned {
            return false;
        }
        *last = Some(event_id);
        true
    }

    /// Run one exchange: append the user turn, build a request from the
    /// history snapshot and current tool ids, send it, and on success append
    /// the assistant turn.
    ///
    /// On failure the already-appended user turn stays in history — the
    /// exchange is deliberately not transactional.
    pub async fn relay(
        &self,
        author_name: &str,
        bot_name: &str,
        content: String,
    ) -> Result<String, CompletionError> {
        tracing::info!("Processing mention from {}: {}", author_name, content);

        let snapshot = {
            let mut history = self.history.lock().await;
            history.append(ChatTurn::user(author_name, content));
            history.snapshot()
        };

        let request = CompletionRequest::build(
            snapshot,
            self.tools.current_ids().await,
            &self.model,
            self.max_tokens,
        );

        let reply = self.client.send(&request).await?;

        self.history
            .lock()
            .await
            .append(ChatTurn::assistant(bot_name, reply.clone()));

        Ok(reply)
    }

    /// Empty the conversation history. Leaves the tool registry untouched.
    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
        tracing::info!("Conversation history cleared");
    }

    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }
}
