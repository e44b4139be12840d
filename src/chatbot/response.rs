//! Response sending utilities for Discord.

use log::info;
use poise::serenity_prelude::{Context, Message as SerenityMessage};

use crate::dispatch::format_chat_reply;
use crate::error::Result;

/// Reply to `new_message` with the model output, labelled with the persona.
pub async fn send_chat_response(
    ctx: &Context,
    new_message: &SerenityMessage,
    persona: Option<&str>,
    reply: Option<String>,
) -> Result<()> {
    if reply.is_none() {
        info!("Gemini returned no text, replying with placeholder");
    }

    let text = format_chat_reply(persona, reply);
    new_message.reply(&ctx.http, &text).await?;
    info!(
        "Replied to {} in channel {}: {}",
        new_message.author.tag(),
        new_message.channel_id,
        text
    );

    Ok(())
}
