//! Discord Message Handler
//!
//! Per-message flow: admission through the relay's guards, mention
//! stripping, replied-to context fetch (best effort), the completion
//! exchange under a typing indicator, and chunked delivery of the reply or
//! a chat-visible error.

use super::DiscordState;
use crate::relay::{EMPTY_CONTENT_REPLY, MentionRelay};
use std::sync::Arc;

use serenity::model::channel::Message;
use serenity::prelude::*;

/// Discord rejects messages longer than this.
const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Author and content of the message a mention replied to.
pub(crate) struct ReplyContext {
    pub author: String,
    pub content: String,
}

/// Remove the bot's mention token(s) and trim whitespace.
/// Discord delivers both the `<@id>` and the nickname `<@!id>` form.
pub(crate) fn strip_mention(content: &str, bot_id: u64) -> String {
    content
        .replace(&format!("<@{bot_id}>"), "")
        .replace(&format!("<@!{bot_id}>"), "")
        .trim()
        .to_string()
}

/// Prepend the quoting line when the mention replied to another message.
pub(crate) fn compose_content(content: &str, reply: Option<&ReplyContext>) -> String {
    match reply {
        Some(quoted) => format!(
            "Replying to '{}': '{}'\n\n{}",
            quoted.author, quoted.content, content
        ),
        None => content.to_string(),
    }
}

/// Split a message into chunks that fit Discord's length limit, preferring
/// to break on a newline near the boundary. `max_len` is in bytes; the cut
/// never lands inside a multibyte character.
pub(crate) fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let break_at = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .filter(|&pos| pos > end - start - 200)
                .map(|pos| start + pos + 1)
                .unwrap_or(end)
        } else {
            end
        };
        chunks.push(&text[start..break_at]);
        start = break_at;
    }
    chunks
}

pub(crate) async fn handle_message(
    ctx: &Context,
    msg: &Message,
    relay: &Arc<MentionRelay>,
    state: &Arc<DiscordState>,
) {
    // Identity arrives with the ready event; until then nothing can be a
    // mention of us.
    let Some(bot_id) = state.bot_user_id().await else {
        return;
    };

    let mentioned = msg.mentions.iter().any(|u| u.id.get() == bot_id);
    if !relay
        .admit(msg.id.get(), msg.author.id.get(), bot_id, mentioned)
        .await
    {
        return;
    }

    let stripped = strip_mention(&msg.content, bot_id);
    let reply_context = fetch_reply_context(ctx, msg).await;
    let content = compose_content(&stripped, reply_context.as_ref());

    if content.is_empty() {
        deliver(ctx, msg, EMPTY_CONTENT_REPLY.to_string()).await;
        return;
    }

    let bot_name = state
        .bot_name()
        .await
        .unwrap_or_else(|| "assistant".to_string());

    let typing = msg.channel_id.start_typing(&ctx.http);
    let outcome = relay.relay(&msg.author.name, &bot_name, content).await;
    typing.stop();

    match outcome {
        Ok(reply) => deliver(ctx, msg, reply).await,
        Err(e) => deliver(ctx, msg, format!("Sorry, I encountered an error: {e}")).await,
    }
}

/// Fetch the replied-to message, if any. A deleted or unfetchable referenced
/// message degrades to "no quote" — never an error to the user.
async fn fetch_reply_context(ctx: &Context, msg: &Message) -> Option<ReplyContext> {
    let reference = msg.message_reference.as_ref()?;
    let message_id = reference.message_id?;
    match msg.channel_id.message(&ctx.http, message_id).await {
        Ok(referenced) => Some(ReplyContext {
            author: referenced.author.name.clone(),
            content: referenced.content.clone(),
        }),
        Err(e) => {
            tracing::debug!("Discord: could not fetch replied-to message: {e}");
            None
        }
    }
}

/// Send `text` as a threaded reply to `msg`, spilling anything past the
/// message limit into follow-up channel sends.
async fn deliver(ctx: &Context, msg: &Message, text: String) {
    let mut chunks = split_message(&text, DISCORD_MESSAGE_LIMIT).into_iter();
    if let Some(first) = chunks.next() {
        if let Err(e) = msg.reply(&ctx.http, first).await {
            tracing::error!("Discord: failed to send reply: {e}");
            return;
        }
    }
    for chunk in chunks {
        if let Err(e) = msg.channel_id.say(&ctx.http, chunk).await {
            tracing::error!("Discord: failed to send reply chunk: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_mention_plain_form() {
        assert_eq!(strip_mention("<@42> hello there", 42), "hello there");
    }

    #[test]
    fn test_strip_mention_nickname_form() {
        assert_eq!(strip_mention("<@!42> hello", 42), "hello");
    }

    #[test]
    fn test_strip_mention_only_leaves_empty() {
        assert_eq!(strip_mention("<@42>", 42), "");
        assert_eq!(strip_mention("  <@42>  ", 42), "");
    }

    #[test]
    fn test_strip_keeps_other_mentions() {
        assert_eq!(strip_mention("<@42> ping <@99>", 42), "ping <@99>");
    }

    #[test]
    fn test_compose_without_reply_is_verbatim() {
        assert_eq!(compose_content("hello", None), "hello");
    }

    #[test]
    fn test_compose_prepends_quote() {
        let quoted = ReplyContext {
            author: "Alice".to_string(),
            content: "Hi".to_string(),
        };
        assert_eq!(
            compose_content("what did she mean?", Some(&quoted)),
            "Replying to 'Alice': 'Hi'\n\nwhat did she mean?"
        );
    }

    #[test]
    fn test_compose_quote_with_empty_content_is_not_empty() {
        // A bare mention replying to a message still reaches the API with
        // just the quote line.
        let quoted = ReplyContext {
            author: "Alice".to_string(),
            content: "Hi".to_string(),
        };
        let composed = compose_content("", Some(&quoted));
        assert!(!composed.is_empty());
        assert!(composed.starts_with("Replying to 'Alice': 'Hi'"));
    }

    #[test]
    fn test_split_short_message() {
        let chunks = split_message("hello", 2000);
        assert_eq!(chunks, vec!["hello"]);
    }

    #[test]
    fn test_split_multibyte_backs_off_to_char_boundary() {
        // 700 x '€' (3 bytes each) = 2100 bytes; byte 2000 falls inside a
        // character, so the cut must move back instead of panicking.
        let text = "€".repeat(700);
        let chunks = split_message(&text, 2000);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 2000);
            assert!(chunk.chars().all(|c| c == '€'));
        }
        let joined: String = chunks.into_iter().collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_split_emoji_near_boundary() {
        // 4-byte scalar straddling the limit.
        let text = format!("{}🦀tail", "a".repeat(1998));
        let chunks = split_message(&text, 2000);
        for chunk in &chunks {
            assert!(chunk.len() <= 2000);
        }
        let joined: String = chunks.into_iter().collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_split_long_message() {
        let text = "a\n".repeat(1500);
        let chunks = split_message(&text, 2000);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 2000);
        }
        let joined: String = chunks.into_iter().collect();
        assert_eq!(joined, text);
    }
}
