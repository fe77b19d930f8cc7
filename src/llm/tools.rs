//! Tool Registry
//!
//! Process-wide cache of tool identifiers attached to the configured model.
//! Fetched once from the model-metadata endpoint during the startup
//! handshake; empty on any failure. Read-only afterwards — request building
//! only ever takes a snapshot.

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

#[derive(Debug, Deserialize)]
struct ModelInfo {
    #[serde(default)]
    meta: ModelMeta,
}

#[derive(Debug, Default, Deserialize)]
struct ModelMeta {
    #[serde(default, rename = "toolIds")]
    tool_ids: Vec<String>,
}

/// Set of opaque tool identifiers, replaced wholesale on each refresh.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    ids: RwLock<Vec<String>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the model's tool ids and replace the registry contents.
    ///
    /// Any failure — non-2xx status, transport error, unparsable body —
    /// leaves the registry empty and is logged, never propagated: a missing
    /// tool list must not block startup.
    pub async fn refresh(
        &self,
        client: &Client,
        base_url: &str,
        api_key: Option<&str>,
        model: &str,
    ) {
        match fetch_tool_ids(client, base_url, api_key, model).await {
            Ok(ids) if ids.is_empty() => {
                tracing::info!("No tools associated with model {}", model);
                self.ids.write().await.clear();
            }
            Ok(ids) => {
                tracing::info!("Fetched {} tool(s) for model {}", ids.len(), model);
                *self.ids.write().await = ids;
            }
            Err(e) => {
                tracing::error!("Failed to fetch tools for model {}: {}", model, e);
                self.ids.write().await.clear();
            }
        }
    }

    /// Snapshot of the current tool ids.
    pub async fn current_ids(&self) -> Vec<String> {
        self.ids.read().await.clone()
    }
}

async fn fetch_tool_ids(
    client: &Client,
    base_url: &str,
    api_key: Option<&str>,
    model: &str,
) -> anyhow::Result<Vec<String>> {
    let url = format!(
        "{}/api/v1/models/model?id={}",
        base_url,
        urlencoding::encode(model)
    );

    let mut request = client
        .get(&url)
        .header(reqwest::header::CONTENT_TYPE, "application/json");
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("model info request returned {status}: {body}");
    }

    let info: ModelInfo = response.json().await?;
    Ok(info.meta.tool_ids)
}
