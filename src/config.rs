use std::collections::HashSet;

use poise::serenity_prelude::{ChannelId, GuildId};
use tracing::{info, warn};

use crate::constants::{
    ENV_DESTINATION_CHANNEL, ENV_DEV_GUILD, ENV_DISCORD_TOKEN, ENV_SOURCE_CHANNELS,
};

/// Configuration errors, all fatal at startup
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidId { variable: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(variable) => write!(
                f,
                "{} environment variable not set. Set it with: export {}=...",
                variable, variable
            ),
            ConfigError::InvalidId { variable, value } => write!(
                f,
                "{} contains '{}', which is not a valid channel id (expected a non-zero number)",
                variable, value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Channels the relay reads from and writes to
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub sources: HashSet<ChannelId>,
    pub destination: ChannelId,
}

impl RelayConfig {
    pub fn is_source(&self, channel_id: ChannelId) -> bool {
        self.sources.contains(&channel_id)
    }
}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub relay: RelayConfig,
    pub dev_guild_id: Option<GuildId>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup(ENV_DISCORD_TOKEN)
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_DISCORD_TOKEN))?;

        let sources = match lookup(ENV_SOURCE_CHANNELS) {
            Some(raw) => parse_channel_list(ENV_SOURCE_CHANNELS, &raw)?,
            None => HashSet::new(),
        };

        let destination = lookup(ENV_DESTINATION_CHANNEL)
            .ok_or(ConfigError::Missing(ENV_DESTINATION_CHANNEL))
            .and_then(|raw| parse_id(ENV_DESTINATION_CHANNEL, &raw))
            .map(ChannelId::new)?;

        if sources.contains(&destination) {
            warn!(
                "{} {} is also listed in {}; messages there will not be forwarded",
                ENV_DESTINATION_CHANNEL, destination, ENV_SOURCE_CHANNELS
            );
        }

        // Optional: development guild ID for faster command registration
        let dev_guild_id = lookup(ENV_DEV_GUILD)
            .and_then(|raw| parse_id(ENV_DEV_GUILD, &raw).ok())
            .map(GuildId::new);

        if dev_guild_id.is_some() {
            info!("Development mode: Commands will be registered to guild only");
        }

        Ok(Config {
            discord_token,
            relay: RelayConfig {
                sources,
                destination,
            },
            dev_guild_id,
        })
    }
}

/// Parse a comma-separated id list, skipping blank entries
pub fn parse_channel_list(
    variable: &'static str,
    raw: &str,
) -> Result<HashSet<ChannelId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_id(variable, entry).map(ChannelId::new))
        .collect()
}

fn parse_id(variable: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(ConfigError::InvalidId {
            variable,
            value: raw.trim().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_channel_list() {
        let ids = parse_channel_list(ENV_SOURCE_CHANNELS, " 100, 200 ,,300 ").unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&ChannelId::new(200)));
    }

    #[test]
    fn test_parse_channel_list_empty() {
        assert!(parse_channel_list(ENV_SOURCE_CHANNELS, "").unwrap().is_empty());
        assert!(parse_channel_list(ENV_SOURCE_CHANNELS, " , ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_channel_list_rejects_garbage() {
        let err = parse_channel_list(ENV_SOURCE_CHANNELS, "100,abc").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidId {
                variable: ENV_SOURCE_CHANNELS,
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_parse_channel_list_rejects_zero() {
        assert!(parse_channel_list(ENV_SOURCE_CHANNELS, "0").is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_DISCORD_TOKEN, "token"),
            (ENV_SOURCE_CHANNELS, "100,200"),
            (ENV_DESTINATION_CHANNEL, "999"),
        ]))
        .unwrap();

        assert_eq!(config.discord_token, "token");
        assert_eq!(config.relay.destination, ChannelId::new(999));
        assert!(config.relay.is_source(ChannelId::new(100)));
        assert!(!config.relay.is_source(ChannelId::new(300)));
        assert_eq!(config.dev_guild_id, None);
    }

    #[test]
    fn test_from_lookup_without_sources() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_DISCORD_TOKEN, "token"),
            (ENV_DESTINATION_CHANNEL, "999"),
            (ENV_DEV_GUILD, "42"),
        ]))
        .unwrap();

        assert!(config.relay.sources.is_empty());
        assert_eq!(config.dev_guild_id, Some(GuildId::new(42)));
    }

    #[test]
    fn test_from_lookup_missing_values() {
        let err = Config::from_lookup(lookup_from(&[(ENV_DESTINATION_CHANNEL, "999")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_DISCORD_TOKEN));

        let err = Config::from_lookup(lookup_from(&[(ENV_DISCORD_TOKEN, "token")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_DESTINATION_CHANNEL));
    }

    #[test]
    fn test_from_lookup_invalid_destination() {
        let err = Config::from_lookup(lookup_from(&[
            (ENV_DISCORD_TOKEN, "token"),
            (ENV_DESTINATION_CHANNEL, "general"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(ENV_DESTINATION_CHANNEL));
    }
}
