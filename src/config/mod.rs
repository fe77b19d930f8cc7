//! Configuration Module
//!
//! Environment-backed configuration: every recognized option comes from the
//! process environment (a `.env` file is loaded first by `main`). Missing
//! required variables and unparsable integers are the only fatal startup
//! errors the relay itself produces.

use anyhow::{Context, Result};
use crate::history::DEFAULT_MAX_HISTORY;

/// Default cap on generated tokens per completion.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Runtime configuration for the relay.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token (`DISCORD_BOT_TOKEN`, required).
    pub discord_token: String,

    /// Base URL of the completion API (`API_URL`, required).
    /// Trailing slashes are trimmed so endpoint joins are well-formed.
    pub api_url: String,

    /// Full completion endpoint override (`COMPLETION_URL`). When unset,
    /// `{api_url}/api/chat/completions` is used.
    pub completion_url: Option<String>,

    /// Bearer token for the completion API (`API_KEY`). When unset, no
    /// `Authorization` header is sent at all.
    pub api_key: Option<String>,

    /// Model identifier (`MODEL`, required).
    pub model: String,

    /// Max output tokens per completion (`MAX_TOKENS`, default 500).
    pub max_tokens: u32,

    /// Max turns kept in conversation history (`MAX_HISTORY_LENGTH`,
    /// default 100).
    pub max_history_length: usize,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let discord_token = require_var("DISCORD_BOT_TOKEN")?;
        let api_url = require_var("API_URL")?.trim_end_matches('/').to_string();
        let model = require_var("MODEL")?;

        let completion_url = optional_var("COMPLETION_URL");
        let api_key = optional_var("API_KEY");

        let max_tokens = parse_var("MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        let max_history_length = parse_var("MAX_HISTORY_LENGTH", DEFAULT_MAX_HISTORY)?;

        Ok(Self {
            discord_token,
            api_url,
            completion_url,
            api_key,
            model,
            max_tokens,
            max_history_length,
        })
    }

    /// Endpoint the completion POST goes to.
    pub fn completion_url(&self) -> String {
        self.completion_url
            .clone()
            .unwrap_or_else(|| format!("{}/api/chat/completions", self.api_url))
    }
}

fn require_var(name: &str) -> Result<String> {
    let value = std::env::var(name)
        .with_context(|| format!("required environment variable {name} is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("required environment variable {name} is empty");
    }
    Ok(value)
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("environment variable {name} is not a valid number: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            discord_token: "token".to_string(),
            api_url: "https://llm.example.com".to_string(),
            completion_url: None,
            api_key: None,
            model: "my-model".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_history_length: DEFAULT_MAX_HISTORY,
        }
    }

    #[test]
    fn test_completion_url_derived_from_base() {
        assert_eq!(
            config().completion_url(),
            "https://llm.example.com/api/chat/completions"
        );
    }

    #[test]
    fn test_completion_url_override_wins() {
        let mut cfg = config();
        cfg.completion_url = Some("https://other.example.com/v1/chat".to_string());
        assert_eq!(cfg.completion_url(), "https://other.example.com/v1/chat");
    }

    #[test]
    fn test_defaults() {
        let cfg = config();
        assert_eq!(cfg.max_tokens, 500);
        assert_eq!(cfg.max_history_length, 100);
    }
}
