use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::{
    models::{Context, Error},
    services::discord_gateway::{
        AttachmentRef, DiscordGateway, SendError, SerenityGateway, TargetChannel,
    },
    utils::messages::{build_permission_error, build_transport_error, format_error, format_success},
    utils::permissions::{Capability, SEND_MEDIA, SEND_TEXT, display_names},
    utils::validation::{parse_channel_id, validate_media_type},
};

use super::{authorize, lookup_channel, reply};

/// Send a text message to a channel
#[poise::command(slash_command, guild_only)]
pub async fn msg(
    ctx: Context<'_>,
    #[description = "ID of the target text channel"] channel_id: String,
    #[description = "The message to send"] message_content: String,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let gateway = SerenityGateway::new(ctx.serenity_context());
    let response = send_text(&gateway, &channel_id, message_content, &ctx.author().name)
        .await
        .unwrap_or_else(|message| message);
    reply(ctx, response).await
}

pub(crate) async fn send_text<G: DiscordGateway>(
    gateway: &G,
    raw_id: &str,
    content: String,
    requested_by: &str,
) -> Result<String, String> {
    let channel = target_channel(gateway, raw_id, SEND_TEXT).await?;

    match gateway.send(channel.id, content, Vec::new()).await {
        Ok(()) => {
            info!("Message sent to #{} by {}", channel.name, requested_by);
            Ok(format_success(&format!("Message sent to {}.", channel.mention())))
        }
        Err(e) => Err(send_failure(&channel, SEND_TEXT, "send the message", e)),
    }
}

/// Send an image or video, with optional text, to a channel
#[poise::command(slash_command, guild_only)]
pub async fn msgimg(
    ctx: Context<'_>,
    #[description = "ID of the target text channel"] channel_id: String,
    #[description = "Image or video to send"] attachment: serenity::Attachment,
    #[description = "Optional message to go with the image/video"]
    message_content: Option<String>,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let gateway = SerenityGateway::new(ctx.serenity_context());
    let response = send_media(
        &gateway,
        &channel_id,
        &AttachmentRef::from(&attachment),
        message_content,
        &ctx.author().name,
    )
    .await
    .unwrap_or_else(|message| message);
    reply(ctx, response).await
}

/// Re-upload a slash-command attachment to a channel.
///
/// The MIME check runs before anything is downloaded or posted.
pub(crate) async fn send_media<G: DiscordGateway>(
    gateway: &G,
    raw_id: &str,
    attachment: &AttachmentRef,
    content: Option<String>,
    requested_by: &str,
) -> Result<String, String> {
    let channel = target_channel(gateway, raw_id, SEND_MEDIA).await?;

    validate_media_type(attachment.content_type.as_deref())
        .map_err(|e| format_error(&e.to_string()))?;

    let file = gateway.fetch_attachment(attachment).await.map_err(|e| {
        error!(
            "Failed to download attachment '{}' ({} bytes): {}",
            attachment.filename, attachment.size, e
        );
        build_transport_error("upload the file", &e)
    })?;

    match gateway
        .send(channel.id, content.unwrap_or_default(), vec![file])
        .await
    {
        Ok(()) => {
            info!(
                "Attachment '{}' sent to #{} by {}",
                attachment.filename, channel.name, requested_by
            );
            Ok(format_success(&format!(
                "Image/video and message sent to {}.",
                channel.mention()
            )))
        }
        Err(e) => Err(send_failure(&channel, SEND_MEDIA, "upload the file", e)),
    }
}

/// Parse, resolve and authorize the target channel of a send command
async fn target_channel<G: DiscordGateway>(
    gateway: &G,
    raw_id: &str,
    required: &[Capability],
) -> Result<TargetChannel, String> {
    let channel_id = parse_channel_id(raw_id).map_err(|e| format_error(&e.to_string()))?;
    let channel = lookup_channel(gateway, channel_id).await?;
    authorize(&channel, required)?;
    Ok(channel)
}

/// Turn a rejected post into the user's reply.
///
/// A 403 does not say which permission was missing, so every one the
/// action needs is named.
fn send_failure(
    channel: &TargetChannel,
    required: &[Capability],
    action: &str,
    err: SendError,
) -> String {
    match err {
        SendError::Forbidden => {
            error!("Missing permission to post in #{}", channel.name);
            build_permission_error(&display_names(required), &channel.mention())
        }
        SendError::Transport(e) => {
            error!("Failed to {} in #{}: {}", action, channel.name, e);
            build_transport_error(action, &e)
        }
    }
}
