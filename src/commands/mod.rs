// Command modules
mod message;
mod register;
mod voice;

use poise::{CreateReply, serenity_prelude::ChannelId};
use tracing::error;

use crate::{
    models::{Context, Error},
    services::discord_gateway::{DiscordGateway, TargetChannel},
    utils::messages::{build_permission_error, build_transport_error, format_error},
    utils::permissions::{Capability, missing_capability},
    utils::validation::ValidationError,
};

// Re-export all commands
pub use message::{msg, msgimg};
pub use register::register;
pub use voice::{joinvc, leavevc};

/// Send the single private follow-up that ends a command
async fn reply(ctx: Context<'_>, content: String) -> Result<(), Error> {
    ctx.send(CreateReply::default().content(content).ephemeral(true))
        .await?;
    Ok(())
}

/// Resolve a channel id to a server channel visible to the bot
async fn lookup_channel<G: DiscordGateway>(
    gateway: &G,
    channel_id: ChannelId,
) -> Result<TargetChannel, String> {
    match gateway.resolve_channel(channel_id).await {
        Ok(Some(channel)) => Ok(channel),
        Ok(None) => Err(format_error(
            &ValidationError::ChannelNotFound(channel_id).to_string(),
        )),
        Err(e) => {
            error!("Failed to look up channel {}: {}", channel_id, e);
            Err(build_transport_error("look up the channel", &e))
        }
    }
}

/// Check the bot's permissions in a channel against what an action needs
fn authorize(channel: &TargetChannel, required: &[Capability]) -> Result<(), String> {
    match missing_capability(channel.permissions, required) {
        Some(capability) => Err(build_permission_error(
            &[capability.display_name()],
            &channel.mention(),
        )),
        None => Ok(()),
    }
}
