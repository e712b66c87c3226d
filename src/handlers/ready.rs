use poise::serenity_prelude::Ready;
use tracing::info;

use crate::models::Data;

/// Log the relay setup once the gateway session is ready
pub fn handle_ready(ready: &Ready, data: &Data) {
    let mut sources: Vec<u64> = data.relay.sources.iter().map(|id| id.get()).collect();
    sources.sort_unstable();

    info!("Logged in as {}", ready.user.name);
    info!("Watching source channels: {:?}", sources);
    info!("Forwarding to channel: {}", data.relay.destination);
}
