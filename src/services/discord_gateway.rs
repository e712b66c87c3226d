/// Outbound Discord access shared by the relay and the commands
use async_trait::async_trait;
use poise::serenity_prelude::{
    self as serenity, ChannelId, ChannelType, CreateAttachment, CreateMessage, GuildId,
    HttpError, ModelError, Permissions,
};

use crate::models::Error;

/// A remote attachment that has not been downloaded yet
#[derive(Debug, Clone)]
pub struct AttachmentRef {
    pub filename: String,
    pub content_type: Option<String>,
    pub size: u32,
    pub url: String,
}

impl From<&serenity::Attachment> for AttachmentRef {
    fn from(attachment: &serenity::Attachment) -> Self {
        Self {
            filename: attachment.filename.clone(),
            content_type: attachment.content_type.clone(),
            size: attachment.size,
            url: attachment.url.clone(),
        }
    }
}

/// A server channel together with the bot's permissions in it
#[derive(Debug, Clone)]
pub struct TargetChannel {
    pub id: ChannelId,
    pub guild_id: GuildId,
    pub kind: ChannelType,
    pub name: String,
    pub permissions: Permissions,
}

impl TargetChannel {
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

/// Failure to post a message
#[derive(Debug)]
pub enum SendError {
    Forbidden,
    Transport(Error),
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::Forbidden => write!(f, "missing permission to send messages or files"),
            SendError::Transport(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SendError {}

/// Channel lookup, attachment download and posting
#[async_trait]
pub trait DiscordGateway: Send + Sync {
    /// A downloaded attachment ready to be re-uploaded
    type File: Send;

    /// Look up a server channel. `Ok(None)` when it is unknown or not visible.
    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<Option<TargetChannel>, Error>;

    async fn fetch_attachment(&self, attachment: &AttachmentRef) -> Result<Self::File, Error>;

    /// Post a message; empty content is left out
    async fn send(
        &self,
        channel_id: ChannelId,
        content: String,
        files: Vec<Self::File>,
    ) -> Result<(), SendError>;
}

/// Gateway backed by the client that delivered the event
pub struct SerenityGateway<'a> {
    ctx: &'a serenity::Context,
}

impl<'a> SerenityGateway<'a> {
    pub fn new(ctx: &'a serenity::Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl DiscordGateway for SerenityGateway<'_> {
    type File = CreateAttachment;

    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<Option<TargetChannel>, Error> {
        let Some(channel) = channel_id
            .to_channel(self.ctx)
            .await
            .ok()
            .and_then(|channel| channel.guild())
        else {
            return Ok(None);
        };

        let bot_id = self.ctx.cache.current_user().id;
        let permissions = channel.permissions_for_user(&self.ctx.cache, bot_id)?;

        Ok(Some(TargetChannel {
            id: channel.id,
            guild_id: channel.guild_id,
            kind: channel.kind,
            name: channel.name,
            permissions,
        }))
    }

    async fn fetch_attachment(&self, attachment: &AttachmentRef) -> Result<CreateAttachment, Error> {
        let file = CreateAttachment::url(&self.ctx.http, &attachment.url).await?;
        Ok(file)
    }

    async fn send(
        &self,
        channel_id: ChannelId,
        content: String,
        files: Vec<CreateAttachment>,
    ) -> Result<(), SendError> {
        let mut builder = CreateMessage::new().add_files(files);
        if !content.is_empty() {
            builder = builder.content(content);
        }

        channel_id
            .send_message(self.ctx, builder)
            .await
            .map(|_| ())
            .map_err(|e| {
                if is_forbidden(&e) {
                    SendError::Forbidden
                } else {
                    SendError::Transport(Box::new(e))
                }
            })
    }
}

/// Whether a serenity error means the bot lacks permission
pub fn is_forbidden(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            is_forbidden_status(response.status_code.as_u16())
        }
        serenity::Error::Model(ModelError::InvalidPermissions { .. }) => true,
        _ => false,
    }
}

fn is_forbidden_status(status: u16) -> bool {
    status == 403
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_forbidden_ignores_other_errors() {
        assert!(!is_forbidden(&serenity::Error::Other("boom")));
    }

    #[test]
    fn test_is_forbidden_on_cached_permission_check() {
        let err = serenity::Error::Model(ModelError::InvalidPermissions {
            required: Permissions::SEND_MESSAGES,
            present: Permissions::empty(),
        });
        assert!(is_forbidden(&err));
    }

    #[test]
    fn test_is_forbidden_status() {
        // `ErrorResponse` is non-exhaustive, so the HTTP branch is checked by status
        assert!(is_forbidden_status(403));
        assert!(!is_forbidden_status(404));
        assert!(!is_forbidden_status(429));
        assert!(!is_forbidden_status(500));
    }

    #[test]
    fn test_target_channel_mention() {
        let channel = TargetChannel {
            id: ChannelId::new(42),
            guild_id: GuildId::new(1),
            kind: ChannelType::Text,
            name: "general".to_string(),
            permissions: Permissions::empty(),
        };
        assert_eq!(channel.mention(), "<#42>");
    }
}
