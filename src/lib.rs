//! CrabRelay - Discord Mention Relay
//!
//! Listens for @mentions on Discord, forwards them (with any replied-to
//! context) to an OpenAI-compatible chat-completion API, and relays the
//! generated reply back to the channel. Keeps one bounded rolling
//! conversation history shared across all channels and users.
//!
//! ## Quick Start
//!
//! ```bash
//! # .env: DISCORD_BOT_TOKEN, API_URL, MODEL (API_KEY optional)
//! crabrelay
//!
//! # With debug logging
//! crabrelay --debug
//! ```

pub mod channels;
pub mod cli;
pub mod config;
pub mod history;
pub mod llm;
pub mod logging;
pub mod relay;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
