use std::sync::Arc;

use crate::config::RelayConfig;

/// Bot state shared across all handlers
#[derive(Clone, Debug)]
pub struct Data {
    /// Source and destination channels for the relay
    pub relay: Arc<RelayConfig>,
}

impl Data {
    /// Create a new Data instance from the relay configuration
    pub fn new(relay: RelayConfig) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
