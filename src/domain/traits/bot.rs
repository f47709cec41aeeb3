use async_trait::async_trait;
use crate::domain::entities::{BotIdentity, RtmEvent};
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Ask the platform who the configured credential belongs to
    async fn identify(&self) -> Result<BotIdentity, BotError>;

    /// Open the realtime event stream
    async fn connect(&self) -> Result<Box<dyn EventSource>, BotError>;

    /// Send a message to a channel
    async fn send_message(&self, channel: &str, text: &str) -> Result<String, BotError>;

    /// Short platform name for logs
    fn platform(&self) -> &'static str;
}

/// A live realtime connection delivering platform events
#[async_trait]
pub trait EventSource: Send {
    /// Next event, or `None` once the connection has ended
    async fn next_event(&mut self) -> Option<Result<RtmEvent, BotError>>;

    /// Release the connection
    async fn close(&mut self) -> Result<(), BotError>;
}
