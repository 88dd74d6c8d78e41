use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, Recipient};
use tracing::{error, info};

use crate::config::Destination;

/// How much of the outgoing message to show in the pre-send log line.
const PREVIEW_LEN: usize = 100;

/// Delivery boundary: one call that either completes or fails with a
/// descriptive cause. Kept as a trait so the dispatch loop can be exercised
/// without a live bot.
#[async_trait]
pub trait MessageSender {
    async fn send(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Sends through the Telegram Bot API with Markdown formatting.
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    pub fn new(token: &str) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

// Legacy Markdown matches the `*bold*` markup the formatter emits; the
// non-legacy dialects would require escaping the message body.
#[allow(deprecated)]
#[async_trait]
impl MessageSender for TelegramSender {
    async fn send(&self, chat_id: &str, text: &str) -> Result<()> {
        let recipient = resolve_recipient(chat_id)?;
        self.bot
            .send_message(recipient, text)
            .parse_mode(ParseMode::Markdown)
            .await
            .with_context(|| format!("Telegram rejected the message for {}", chat_id))?;
        Ok(())
    }
}

/// `@username` targets a public channel/group by name; anything else must be
/// a numeric chat id (negative for groups and channels).
fn resolve_recipient(chat_id: &str) -> Result<Recipient> {
    if chat_id.starts_with('@') {
        return Ok(Recipient::ChannelUsername(chat_id.to_string()));
    }
    let id: i64 = chat_id
        .parse()
        .with_context(|| format!("Invalid chat id: {}", chat_id))?;
    Ok(Recipient::Id(ChatId(id)))
}

/// Deliver one message to every destination, in order.
///
/// A failed delivery is logged with its full cause and then propagated,
/// which aborts the loop: destinations after the failed one are not
/// attempted in this run.
pub async fn dispatch_all<S>(sender: &S, destinations: &[Destination], text: &str) -> Result<()>
where
    S: MessageSender + Sync + ?Sized,
{
    for dest in destinations {
        info!(
            "Sending message to {} ({}): {}...",
            dest.label,
            dest.chat_id,
            preview(text)
        );
        if let Err(e) = sender.send(&dest.chat_id, text).await {
            error!("Failed to send to {}: {:#}", dest.label, e);
            return Err(e.context(format!("Delivery to {} failed", dest.label)));
        }
        info!("Message sent successfully to {}", dest.label);
    }
    Ok(())
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
