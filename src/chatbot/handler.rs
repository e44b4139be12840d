//! Main handler for messages that mention the bot.

use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use poise::serenity_prelude::{Context, Message as SerenityMessage, UserId};

use crate::bot::Data;
use crate::dispatch::{Action, dispatch, should_handle, strip_mentions};
use crate::error::{BotError, Result};

use super::image::create_images;
use super::response::send_chat_response;

/// Handle a single inbound message.
pub async fn handle_message(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
    bot_user_id: UserId,
) -> Result<()> {
    if !should_handle(
        new_message.author.bot,
        new_message.mentions_user_id(bot_user_id),
        new_message.mention_everyone,
    ) {
        return Ok(());
    }

    info!(
        "Received message from {} in channel {}: {}",
        new_message.author.tag(),
        new_message.channel_id,
        new_message.content
    );

    let content = strip_mentions(&new_message.content, bot_user_id);
    let action = dispatch(
        data.user_store(),
        data.models(),
        new_message.author.id,
        &new_message.author.name,
        &content,
    );

    match action {
        Action::Reply(text) => {
            new_message.reply(&ctx.http, &text).await?;
            info!(
                "Replied to {} in channel {}: {}",
                new_message.author.tag(),
                new_message.channel_id,
                text
            );
        }
        Action::GenerateImage { prompt, model } => {
            create_images(ctx, new_message, data, &prompt, &model).await?;
        }
        Action::Chat(request) => {
            broadcast_typing(ctx, new_message).await;
            let reply = with_timeout(
                data.request_timeout(),
                data.gemini_client()
                    .generate_text(&request.prompt, &request.model),
            )
            .await?;
            send_chat_response(ctx, new_message, request.persona.as_deref(), reply).await?;
        }
    }

    Ok(())
}

pub(super) async fn broadcast_typing(ctx: &Context, new_message: &SerenityMessage) {
    if let Err(e) = new_message.channel_id.broadcast_typing(&ctx.http).await {
        debug!("Failed to broadcast typing indicator: {e}");
    }
}

/// Bound a Gemini call by the configured request timeout.
pub(super) async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| BotError::Timeout(limit))?
}
