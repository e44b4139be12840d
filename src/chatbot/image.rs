//! Image generation and upload for the `create` command.

use log::{debug, error, info};
use poise::serenity_prelude::{
    Context, CreateAttachment, CreateMessage, Message as SerenityMessage,
};

use crate::bot::Data;
use crate::dispatch::{IMAGE_DONE_REPLY, IMAGE_FAILED_REPLY, IMAGE_SEND_FAILED_REPLY};
use crate::error::Result;
use crate::gemini::GenerateContentResponse;

use super::handler::{broadcast_typing, with_timeout};

/// Generate images for `prompt` and post them to the message's channel.
pub async fn create_images(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
    prompt: &str,
    model: &str,
) -> Result<()> {
    debug!("Image generation with model {model} and prompt: '{prompt}'");
    broadcast_typing(ctx, new_message).await;

    let Some(response) = with_timeout(
        data.request_timeout(),
        data.gemini_client().generate_image(prompt, model),
    )
    .await?
    else {
        new_message.reply(&ctx.http, IMAGE_FAILED_REPLY).await?;
        return Ok(());
    };

    match send_images(ctx, new_message, &response).await {
        Ok(count) => info!(
            "Sent {count} generated images to {} in channel {}",
            new_message.author.tag(),
            new_message.channel_id
        ),
        Err(e) => {
            error!("Failed to send generated image: {e}");
            new_message.reply(&ctx.http, IMAGE_SEND_FAILED_REPLY).await?;
        }
    }

    Ok(())
}

/// Upload every inline image of `response`, then confirm completion.
///
/// A response without image parts still gets the completion reply.
async fn send_images(
    ctx: &Context,
    new_message: &SerenityMessage,
    response: &GenerateContentResponse,
) -> Result<usize> {
    let mut sent = 0;
    for (index, inline) in response.inline_images() {
        let filename = format!("gen_image_{index}.{}", inline.extension());
        let bytes = inline.decode()?;
        debug!("Uploading {filename} ({} bytes)", bytes.len());

        let message = CreateMessage::new().add_file(CreateAttachment::bytes(bytes, filename));
        new_message
            .channel_id
            .send_message(&ctx.http, message)
            .await?;
        sent += 1;
    }

    new_message.reply(&ctx.http, IMAGE_DONE_REPLY).await?;
    Ok(sent)
}
