//! Discord Integration
//!
//! Runs the Discord bot: gateway connection, startup handshake (identity,
//! presence, tool fetch, slash-command registration), and routing of
//! messages and interactions into the relay core.

pub(crate) mod handler;

use crate::config::Config;
use crate::llm::ToolRegistry;
use crate::relay::MentionRelay;
use anyhow::{Context as _, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

use serenity::async_trait;
use serenity::builder::{CreateCommand, CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::gateway::ActivityData;
use serenity::model::application::{Command, Interaction};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;

/// Identity captured from the `ready` event.
///
/// The bot's user id drives mention detection and the self-message guard;
/// the name attributes assistant turns in history.
pub struct DiscordState {
    bot_user_id: Mutex<Option<u64>>,
    bot_name: Mutex<Option<String>>,
}

impl Default for DiscordState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscordState {
    pub fn new() -> Self {
        Self {
            bot_user_id: Mutex::new(None),
            bot_name: Mutex::new(None),
        }
    }

    pub async fn set_identity(&self, id: u64, name: String) {
        *self.bot_user_id.lock().await = Some(id);
        *self.bot_name.lock().await = Some(name);
    }

    pub async fn bot_user_id(&self) -> Option<u64> {
        *self.bot_user_id.lock().await
    }

    pub async fn bot_name(&self) -> Option<String> {
        self.bot_name.lock().await.clone()
    }
}

/// Connect to Discord and dispatch events until the client stops.
pub async fn run(config: Config) -> Result<()> {
    let tools = Arc::new(ToolRegistry::new());
    let relay = Arc::new(MentionRelay::new(&config, tools.clone()));

    let event_handler = Handler {
        relay,
        tools,
        state: Arc::new(DiscordState::new()),
        http: reqwest::Client::new(),
        config: config.clone(),
    };

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(event_handler)
        .await
        .context("failed to create Discord client")?;

    client.start().await.context("Discord client error")?;
    Ok(())
}

/// Serenity event handler — routes messages and interactions to the relay.
struct Handler {
    relay: Arc<MentionRelay>,
    tools: Arc<ToolRegistry>,
    state: Arc<DiscordState>,
    http: reqwest::Client,
    config: Config,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("Discord: connected as {} (id={})", ready.user.name, ready.user.id);
        self.state
            .set_identity(ready.user.id.get(), ready.user.name.clone())
            .await;
        ctx.set_activity(Some(ActivityData::listening("mentions")));

        // One-time tool fetch, before any mention is dispatched. Failures
        // degrade to an empty registry and never block startup.
        self.tools
            .refresh(
                &self.http,
                &self.config.api_url,
                self.config.api_key.as_deref(),
                &self.config.model,
            )
            .await;

        let command =
            CreateCommand::new("clear_context").description("Clears the conversation context.");
        match Command::create_global_command(&ctx.http, command).await {
            Ok(_) => tracing::info!("Discord: registered /clear_context"),
            Err(e) => tracing::error!("Discord: failed to register commands: {e}"),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        handler::handle_message(&ctx, &msg, &self.relay, &self.state).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            if command.data.name == "clear_context" {
                self.relay.clear_history().await;
                let response = CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content("Conversation context has been cleared."),
                );
                if let Err(e) = command.create_response(&ctx.http, response).await {
                    tracing::error!("Discord: failed to acknowledge /clear_context: {e}");
                }
            }
        }
    }
}
