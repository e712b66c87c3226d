use poise::serenity_prelude::{ChannelId, ChannelType, GuildId};

use crate::constants::MEDIA_MIME_PREFIXES;

/// Validation error types
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    NotInGuild,
    InvalidChannelId(String),
    ChannelNotFound(ChannelId),
    ChannelInOtherGuild(ChannelId),
    InvalidChannelType { expected: ChannelType, got: ChannelType },
    UnsupportedMediaType(Option<String>),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NotInGuild => write!(f, "This command must be used in a server"),
            ValidationError::InvalidChannelId(raw) => write!(
                f,
                "'{}' is not a valid channel ID. Make sure the ID is a number.",
                raw
            ),
            ValidationError::ChannelNotFound(id) => write!(
                f,
                "Channel {} was not found or I don't have access to it.",
                id
            ),
            ValidationError::ChannelInOtherGuild(id) => {
                write!(f, "Channel {} does not belong to this server.", id)
            }
            ValidationError::InvalidChannelType { expected, got } => write!(
                f,
                "Expected a {:?} channel, got a {:?} channel",
                expected, got
            ),
            ValidationError::UnsupportedMediaType(Some(mime)) => write!(
                f,
                "The uploaded file ({}) is not an image or video. Only images and videos are supported.",
                mime
            ),
            ValidationError::UnsupportedMediaType(None) => write!(
                f,
                "The uploaded file has no content type. Only images and videos are supported."
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Parse a user-supplied channel id string
pub fn parse_channel_id(raw: &str) -> Result<ChannelId, ValidationError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id != 0 => Ok(ChannelId::new(id)),
        _ => Err(ValidationError::InvalidChannelId(raw.trim().to_string())),
    }
}

/// Validate that a channel is of the expected type
pub fn validate_channel_type(
    got: ChannelType,
    expected: ChannelType,
) -> Result<(), ValidationError> {
    if got != expected {
        return Err(ValidationError::InvalidChannelType { expected, got });
    }
    Ok(())
}

/// Validate that a channel belongs to the guild the command was used in
pub fn validate_channel_guild(
    channel_id: ChannelId,
    channel_guild: GuildId,
    guild_id: GuildId,
) -> Result<(), ValidationError> {
    if channel_guild != guild_id {
        return Err(ValidationError::ChannelInOtherGuild(channel_id));
    }
    Ok(())
}

/// Validate that an attachment's declared MIME type is an image or video
pub fn validate_media_type(content_type: Option<&str>) -> Result<(), ValidationError> {
    match content_type {
        Some(mime) if MEDIA_MIME_PREFIXES.iter().any(|p| mime.starts_with(p)) => Ok(()),
        other => Err(ValidationError::UnsupportedMediaType(
            other.map(str::to_string),
        )),
    }
}

/// Extract guild ID from context, returning error if not in a guild
pub fn require_guild(guild_id: Option<GuildId>) -> Result<GuildId, ValidationError> {
    guild_id.ok_or(ValidationError::NotInGuild)
}
