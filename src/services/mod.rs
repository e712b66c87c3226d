/// Outbound seams over the Discord client
pub mod discord_gateway;
pub mod voice_service;
