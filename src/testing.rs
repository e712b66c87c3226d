//! In-memory fakes of the Discord and voice seams for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, ChannelType, GuildId, Permissions};

use crate::{
    models::Error,
    services::discord_gateway::{AttachmentRef, DiscordGateway, SendError, TargetChannel},
    services::voice_service::VoiceConnector,
};

/// A message recorded by [`FakeGateway::send`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: ChannelId,
    pub content: String,
    pub files: Vec<String>,
}

/// Gateway that serves channels from a map and records every outbound call
#[derive(Default)]
pub struct FakeGateway {
    pub channels: HashMap<ChannelId, TargetChannel>,
    pub failing_files: HashSet<String>,
    pub forbidden: bool,
    fetched: Mutex<Vec<String>>,
    sent: Mutex<Vec<SentMessage>>,
}

impl FakeGateway {
    pub fn with_channel(mut self, channel: TargetChannel) -> Self {
        self.channels.insert(channel.id, channel);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiscordGateway for FakeGateway {
    type File = String;

    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<Option<TargetChannel>, Error> {
        Ok(self.channels.get(&channel_id).cloned())
    }

    async fn fetch_attachment(&self, attachment: &AttachmentRef) -> Result<String, Error> {
        self.fetched.lock().unwrap().push(attachment.filename.clone());
        if self.failing_files.contains(&attachment.filename) {
            return Err("404 Not Found".into());
        }
        Ok(attachment.filename.clone())
    }

    async fn send(
        &self,
        channel_id: ChannelId,
        content: String,
        files: Vec<String>,
    ) -> Result<(), SendError> {
        if self.forbidden {
            return Err(SendError::Forbidden);
        }
        self.sent.lock().unwrap().push(SentMessage {
            channel_id,
            content,
            files,
        });
        Ok(())
    }
}

/// Voice connector holding one connection per guild and logging each call
#[derive(Default)]
pub struct FakeConnector {
    connections: Mutex<HashMap<GuildId, ChannelId>>,
    calls: Mutex<Vec<String>>,
    fail_connect: bool,
}

impl FakeConnector {
    pub fn connected_to(guild: GuildId, channel: ChannelId) -> Self {
        let connector = Self::default();
        connector.connections.lock().unwrap().insert(guild, channel);
        connector
    }

    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn connection(&self, guild: GuildId) -> Option<ChannelId> {
        self.connections.lock().unwrap().get(&guild).copied()
    }
}

#[async_trait]
impl VoiceConnector for FakeConnector {
    async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.connection(guild_id)
    }

    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), Error> {
        self.calls.lock().unwrap().push(format!("connect {}", channel_id));
        if self.fail_connect {
            return Err("voice gateway timed out".into());
        }
        self.connections.lock().unwrap().insert(guild_id, channel_id);
        Ok(())
    }

    async fn disconnect(&self, guild_id: GuildId) -> Result<(), Error> {
        self.calls.lock().unwrap().push("disconnect".to_string());
        self.connections.lock().unwrap().remove(&guild_id);
        Ok(())
    }
}

pub fn channel(
    id: u64,
    guild: u64,
    kind: ChannelType,
    name: &str,
    permissions: Permissions,
) -> TargetChannel {
    TargetChannel {
        id: ChannelId::new(id),
        guild_id: GuildId::new(guild),
        kind,
        name: name.to_string(),
        permissions,
    }
}

pub fn attachment(name: &str, content_type: &str) -> AttachmentRef {
    AttachmentRef {
        filename: name.to_string(),
        content_type: Some(content_type.to_string()),
        size: 1024,
        url: format!("https://cdn.example/{}", name),
    }
}
