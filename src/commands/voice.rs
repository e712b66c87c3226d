use poise::serenity_prelude::{ChannelId, ChannelType, GuildId};
use tracing::{error, info};

use crate::{
    models::{Context, Error},
    services::discord_gateway::{DiscordGateway, SerenityGateway},
    services::voice_service::{
        JoinOutcome, LeaveOutcome, SongbirdConnector, VoiceConnector, VoiceError, VoiceService,
    },
    utils::messages::{
        build_transport_error, format_error, format_info, format_success, format_warning,
        join_lines,
    },
    utils::permissions::JOIN_VOICE,
    utils::validation::{
        parse_channel_id, require_guild, validate_channel_guild, validate_channel_type,
    },
};

use super::{authorize, lookup_channel, reply};

/// Make the bot join a voice channel in this server
#[poise::command(slash_command, guild_only)]
pub async fn joinvc(
    ctx: Context<'_>,
    #[description = "ID of the voice channel to join"] channel_id: String,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let gateway = SerenityGateway::new(ctx.serenity_context());
    let response = match SongbirdConnector::from_context(ctx.serenity_context()).await {
        Ok(connector) => join_voice_channel(
            &gateway,
            &connector,
            ctx.guild_id(),
            &channel_id,
            &ctx.author().name,
        )
        .await
        .unwrap_or_else(|message| message),
        Err(e) => {
            error!("Voice client unavailable: {}", e);
            build_transport_error("join the voice channel", &e)
        }
    };
    reply(ctx, response).await
}

/// Validate the target and move the bot's voice connection there.
///
/// Staying in the current channel needs no permissions, so the already
/// connected case is answered before the permission gate.
pub(crate) async fn join_voice_channel<G: DiscordGateway, V: VoiceConnector>(
    gateway: &G,
    connector: &V,
    guild_id: Option<GuildId>,
    raw_id: &str,
    requested_by: &str,
) -> Result<String, String> {
    let guild_id = require_guild(guild_id).map_err(|e| format_error(&e.to_string()))?;
    let channel_id = parse_channel_id(raw_id).map_err(|e| format_error(&e.to_string()))?;

    let channel = lookup_channel(gateway, channel_id).await?;
    validate_channel_guild(channel.id, channel.guild_id, guild_id)
        .and_then(|()| validate_channel_type(channel.kind, ChannelType::Voice))
        .map_err(|e| format_error(&e.to_string()))?;
    let mention = channel.mention();

    if connector.current_channel(guild_id).await == Some(channel.id) {
        return Ok(already_connected(&mention));
    }

    authorize(&channel, JOIN_VOICE)?;

    match VoiceService::new(connector).join(guild_id, channel.id).await {
        Ok(JoinOutcome::AlreadyConnected) => Ok(already_connected(&mention)),
        Ok(JoinOutcome::Joined { previous }) => {
            info!(
                "Joined voice channel {} in guild {} (requested by {})",
                channel.name, guild_id, requested_by
            );
            Ok(join_lines(&[
                switched_notice(previous),
                format_success(&format!("Joined voice channel {}!", mention)),
            ]))
        }
        Err(VoiceError::Connect { previous, cause }) => {
            error!("Failed to join voice channel {}: {}", channel.id, cause);
            Err(join_lines(&[
                switched_notice(previous),
                build_transport_error("join the voice channel", &cause),
            ]))
        }
        Err(e @ VoiceError::Disconnect { .. }) => {
            error!("Failed to leave voice channel in guild {}: {}", guild_id, e);
            Err(build_transport_error("switch voice channels", &e))
        }
    }
}

fn already_connected(mention: &str) -> String {
    format_success(&format!("Already connected to {}.", mention))
}

fn switched_notice(previous: Option<ChannelId>) -> String {
    previous
        .map(|channel| {
            format_warning(&format!(
                "Was connected to <#{}>, disconnected before joining the new channel.",
                channel
            ))
        })
        .unwrap_or_default()
}

/// Make the bot leave its current voice channel
#[poise::command(slash_command, guild_only)]
pub async fn leavevc(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let gateway = SerenityGateway::new(ctx.serenity_context());
    let response = match SongbirdConnector::from_context(ctx.serenity_context()).await {
        Ok(connector) => leave_voice_channel(&gateway, &connector, ctx.guild_id())
            .await
            .unwrap_or_else(|message| message),
        Err(e) => {
            error!("Voice client unavailable: {}", e);
            build_transport_error("leave the voice channel", &e)
        }
    };
    reply(ctx, response).await
}

pub(crate) async fn leave_voice_channel<G: DiscordGateway, V: VoiceConnector>(
    gateway: &G,
    connector: &V,
    guild_id: Option<GuildId>,
) -> Result<String, String> {
    let guild_id = require_guild(guild_id).map_err(|e| format_error(&e.to_string()))?;

    match VoiceService::new(connector).leave(guild_id).await {
        Ok(LeaveOutcome::Left(channel_id)) => {
            // Only used for the reply, so a failed lookup falls back to the id
            let name = match gateway.resolve_channel(channel_id).await {
                Ok(Some(channel)) => channel.name,
                _ => channel_id.to_string(),
            };
            info!("Left voice channel {} in guild {}", name, guild_id);
            Ok(format_success(&format!("Left voice channel **{}**.", name)))
        }
        Ok(LeaveOutcome::NotConnected) => Ok(format_info(
            "I'm not connected to any voice channel in this server.",
        )),
        Err(e) => {
            error!("Failed to leave voice channel in guild {}: {}", guild_id, e);
            Err(build_transport_error("leave the voice channel", &e))
        }
    }
}
