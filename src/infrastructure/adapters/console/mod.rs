//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::application::errors::BotError;
use crate::domain::entities::{BotIdentity, IncomingMessage, RtmEvent};
use crate::domain::traits::{Bot, EventSource};

pub const CONSOLE_CHANNEL: &str = "console";
const CONSOLE_USER: &str = "developer";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    identity: BotIdentity,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            identity: BotIdentity::new("console"),
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn identify(&self) -> Result<BotIdentity, BotError> {
        Ok(self.identity.clone())
    }

    async fn connect(&self) -> Result<Box<dyn EventSource>, BotError> {
        tracing::info!("Starting console bot (dev mode), address it as {} <command>", self.identity);
        Ok(Box::new(ConsoleSource::new(BufReader::new(tokio::io::stdin()))))
    }

    async fn send_message(&self, channel: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        tracing::debug!("posted to {}", channel);
        Ok("console_msg".to_string())
    }

    fn platform(&self) -> &'static str {
        "console"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Connecting,
    Reading,
    Closing,
    Closed,
}

/// Turns input lines into realtime events: connected, one message per
/// line, then disconnecting at end of input.
pub struct ConsoleSource<R = BufReader<Stdin>> {
    input: R,
    phase: Phase,
}

impl<R> ConsoleSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        Self {
            input,
            phase: Phase::Connecting,
        }
    }
}

#[async_trait]
impl<R> EventSource for ConsoleSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_event(&mut self) -> Option<Result<RtmEvent, BotError>> {
        match self.phase {
            Phase::Connecting => {
                self.phase = Phase::Reading;
                Some(Ok(RtmEvent::Connected))
            }
            Phase::Reading => {
                let mut line = String::new();
                match self.input.read_line(&mut line).await {
                    Ok(0) => {
                        self.phase = Phase::Closed;
                        Some(Ok(RtmEvent::Disconnecting))
                    }
                    Ok(_) => {
                        let msg = IncomingMessage::new(CONSOLE_CHANNEL, line.trim_end_matches(&['\r', '\n'][..]))
                            .with_user(CONSOLE_USER);
                        Some(Ok(RtmEvent::Message(msg)))
                    }
                    Err(e) => {
                        self.phase = Phase::Closed;
                        Some(Err(BotError::Network(e.to_string())))
                    }
                }
            }
            Phase::Closing => {
                self.phase = Phase::Closed;
                Some(Ok(RtmEvent::Disconnecting))
            }
            Phase::Closed => None,
        }
    }

    async fn close(&mut self) -> Result<(), BotError> {
        if self.phase != Phase::Closed {
            self.phase = Phase::Closing;
        }
        Ok(())
    }
}
