use std::fmt;

use super::IncomingMessage;

/// Event types the session subscribes handlers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ConnectionEstablished,
    Message,
    ConnectionClosing,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ConnectionEstablished => "connection-established",
            EventKind::Message => "message",
            EventKind::ConnectionClosing => "connection-closing",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event delivered by the realtime event source
#[derive(Debug, Clone, PartialEq)]
pub enum RtmEvent {
    Connected,
    Message(IncomingMessage),
    Disconnecting,
    /// Anything the bot has no handler for
    Other(String),
}

impl RtmEvent {
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            RtmEvent::Connected => Some(EventKind::ConnectionEstablished),
            RtmEvent::Message(_) => Some(EventKind::Message),
            RtmEvent::Disconnecting => Some(EventKind::ConnectionClosing),
            RtmEvent::Other(_) => None,
        }
    }
}
