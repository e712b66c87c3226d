/// Voice service - handles the per-guild voice connection
use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, ChannelId, GuildId};
use songbird::Songbird;

use crate::models::Error;

/// Access to the bot's voice connection in a guild
#[async_trait]
pub trait VoiceConnector: Send + Sync {
    /// The voice channel the bot is connected to in this guild, if any
    async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId>;

    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), Error>;

    async fn disconnect(&self, guild_id: GuildId) -> Result<(), Error>;
}

/// Result of a join request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    AlreadyConnected,
    Joined { previous: Option<ChannelId> },
}

/// Result of a leave request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    NotConnected,
    Left(ChannelId),
}

/// Voice operation failures
#[derive(Debug)]
pub enum VoiceError {
    /// Leaving the previous channel failed; the bot stays where it was
    Disconnect { channel: ChannelId, cause: Error },
    /// Connecting failed; any previous channel has already been left
    Connect { previous: Option<ChannelId>, cause: Error },
}

impl std::fmt::Display for VoiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceError::Disconnect { channel, cause } => {
                write!(f, "could not leave <#{}>: {}", channel, cause)
            }
            VoiceError::Connect { cause, .. } => write!(f, "{}", cause),
        }
    }
}

impl std::error::Error for VoiceError {}

/// Service for voice-related operations
pub struct VoiceService<'a, C: VoiceConnector> {
    connector: &'a C,
}

impl<'a, C: VoiceConnector> VoiceService<'a, C> {
    /// Create a new voice service
    pub fn new(connector: &'a C) -> Self {
        Self { connector }
    }

    /// Join a voice channel, leaving any other channel in the guild first.
    ///
    /// The occupancy check and the connect are not atomic; two concurrent
    /// joins for the same guild can race.
    pub async fn join(
        &self,
        guild_id: GuildId,
        target: ChannelId,
    ) -> Result<JoinOutcome, VoiceError> {
        let previous = self.connector.current_channel(guild_id).await;

        if previous == Some(target) {
            return Ok(JoinOutcome::AlreadyConnected);
        }

        if let Some(channel) = previous {
            self.connector
                .disconnect(guild_id)
                .await
                .map_err(|cause| VoiceError::Disconnect { channel, cause })?;
        }

        self.connector
            .connect(guild_id, target)
            .await
            .map_err(|cause| VoiceError::Connect { previous, cause })?;

        Ok(JoinOutcome::Joined { previous })
    }

    /// Leave the current voice channel, if any
    pub async fn leave(&self, guild_id: GuildId) -> Result<LeaveOutcome, Error> {
        match self.connector.current_channel(guild_id).await {
            Some(channel) => {
                self.connector.disconnect(guild_id).await?;
                Ok(LeaveOutcome::Left(channel))
            }
            None => Ok(LeaveOutcome::NotConnected),
        }
    }
}

/// Voice connector backed by songbird's gateway integration
pub struct SongbirdConnector {
    manager: Arc<Songbird>,
}

impl SongbirdConnector {
    /// Fetch the songbird manager registered on the client
    pub async fn from_context(ctx: &serenity::Context) -> Result<Self, Error> {
        let manager = songbird::get(ctx)
            .await
            .ok_or("Songbird voice client was not registered")?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl VoiceConnector for SongbirdConnector {
    async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        let call = self.manager.get(guild_id)?;
        let channel = call.lock().await.current_channel()?;
        Some(ChannelId::new(channel.0.get()))
    }

    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), Error> {
        self.manager.join_gateway(guild_id, channel_id).await?;
        Ok(())
    }

    async fn disconnect(&self, guild_id: GuildId) -> Result<(), Error> {
        self.manager.remove(guild_id).await?;
        Ok(())
    }
}
