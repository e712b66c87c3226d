/// Environment variable holding the bot token
pub const ENV_DISCORD_TOKEN: &str = "DISCORD_TOKEN";

/// Environment variable holding the comma-separated source channel ids
pub const ENV_SOURCE_CHANNELS: &str = "FROM_CHANNEL_IDS";

/// Environment variable holding the destination channel id
pub const ENV_DESTINATION_CHANNEL: &str = "TO_CHANNEL_ID";

/// Environment variable holding the optional development guild id
pub const ENV_DEV_GUILD: &str = "DEV_GUILD_ID";

/// Prefix for text commands
pub const COMMAND_PREFIX: &str = "!";

/// MIME type prefixes accepted by the media command
pub const MEDIA_MIME_PREFIXES: [&str; 2] = ["image/", "video/"];

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "relay_bot=info";
