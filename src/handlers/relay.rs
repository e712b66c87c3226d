use poise::serenity_prelude::{self as serenity, ChannelId, UserId};
use tracing::{debug, error, info, warn};

use crate::{
    config::RelayConfig,
    models::Data,
    services::discord_gateway::{AttachmentRef, DiscordGateway, SendError, SerenityGateway},
};

/// The parts of an inbound message the relay looks at
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub author_id: UserId,
    pub author_name: String,
    pub channel_id: ChannelId,
    pub content: String,
    pub attachments: Vec<AttachmentRef>,
}

impl InboundMessage {
    pub fn from_message(message: &serenity::Message) -> Self {
        // Guild nickname first, then global display name, then username
        let author_name = message
            .member
            .as_ref()
            .and_then(|member| member.nick.clone())
            .unwrap_or_else(|| message.author.display_name().to_string());

        Self {
            author_id: message.author.id,
            author_name,
            channel_id: message.channel_id,
            content: message.content.clone(),
            attachments: message.attachments.iter().map(AttachmentRef::from).collect(),
        }
    }
}

/// Why a message was not forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    OwnMessage,
    DestinationChannel,
    NotSource,
}

/// Result of running one message through the relay
#[derive(Debug)]
pub enum RelayOutcome {
    Skipped(SkipReason),
    DestinationUnavailable,
    Empty,
    Forwarded { attachments: usize, dropped: usize },
    Failed(SendError),
}

/// Decide whether a message should be forwarded at all
pub fn relay_decision(
    message: &InboundMessage,
    self_id: UserId,
    config: &RelayConfig,
) -> Result<(), SkipReason> {
    if message.author_id == self_id {
        return Err(SkipReason::OwnMessage);
    }
    // Checked before source membership so a misconfigured destination never loops
    if message.channel_id == config.destination {
        return Err(SkipReason::DestinationChannel);
    }
    if !config.is_source(message.channel_id) {
        return Err(SkipReason::NotSource);
    }
    Ok(())
}

/// Build the forwarded text with the author label
pub fn compose_forward_text(author_name: &str, content: &str) -> String {
    format!("{}: {}", author_name, content)
}

/// Run one inbound message through the relay
pub async fn relay_message<G: DiscordGateway>(
    gateway: &G,
    config: &RelayConfig,
    self_id: UserId,
    message: &InboundMessage,
) -> RelayOutcome {
    if let Err(reason) = relay_decision(message, self_id, config) {
        return RelayOutcome::Skipped(reason);
    }

    let destination = match gateway.resolve_channel(config.destination).await {
        Ok(Some(channel)) => channel,
        Ok(None) => {
            error!(
                "Destination channel {} not found or not accessible",
                config.destination
            );
            return RelayOutcome::DestinationUnavailable;
        }
        Err(e) => {
            error!(
                "Failed to look up destination channel {}: {}",
                config.destination, e
            );
            return RelayOutcome::DestinationUnavailable;
        }
    };

    let content = compose_forward_text(&message.author_name, &message.content);

    let mut files = Vec::with_capacity(message.attachments.len());
    for attachment in &message.attachments {
        match gateway.fetch_attachment(attachment).await {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!(
                    "Failed to fetch attachment '{}' ({}, {} bytes) from channel {}: {}",
                    attachment.filename,
                    attachment.content_type.as_deref().unwrap_or("unknown type"),
                    attachment.size,
                    message.channel_id,
                    e
                );
            }
        }
    }
    let dropped = message.attachments.len() - files.len();

    if message.content.is_empty() && files.is_empty() {
        return RelayOutcome::Empty;
    }

    let attachments = files.len();
    match gateway.send(destination.id, content, files).await {
        Ok(()) => {
            info!(
                "Forwarded message from {} in {} to #{} ({} attachment(s))",
                message.author_name, message.channel_id, destination.name, attachments
            );
            RelayOutcome::Forwarded {
                attachments,
                dropped,
            }
        }
        Err(SendError::Forbidden) => {
            error!(
                "Missing permission to send messages or files in #{}",
                destination.name
            );
            RelayOutcome::Failed(SendError::Forbidden)
        }
        Err(e) => {
            error!("Failed to forward message to #{}: {}", destination.name, e);
            RelayOutcome::Failed(e)
        }
    }
}

/// Handle a message-created event
pub async fn handle_message(ctx: &serenity::Context, message: &serenity::Message, data: &Data) {
    let self_id = ctx.cache.current_user().id;
    let inbound = InboundMessage::from_message(message);
    let gateway = SerenityGateway::new(ctx);

    match relay_message(&gateway, &data.relay, self_id, &inbound).await {
        RelayOutcome::Skipped(reason) => {
            debug!("Not forwarding message {}: {:?}", message.id, reason);
        }
        RelayOutcome::Empty => {
            debug!("Message {} had nothing left to forward", message.id);
        }
        RelayOutcome::Forwarded {
            attachments,
            dropped,
        } => {
            debug!(
                "Message {} forwarded with {} attachment(s), {} dropped",
                message.id, attachments, dropped
            );
        }
        RelayOutcome::Failed(e) => {
            debug!("Message {} was not forwarded: {}", message.id, e);
        }
        RelayOutcome::DestinationUnavailable => {}
    }
}
