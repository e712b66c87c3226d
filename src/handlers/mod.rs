/// Handler modules for Discord events
mod ready;
pub mod relay;

// Re-export main handler functions
pub use ready::handle_ready;
pub use relay::handle_message;
