//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod event;
pub mod filter;
pub mod identity;
pub mod message;

pub use command::{CommandInvocation, CommandKind, CommandSpec, CommandTable};
pub use event::{EventKind, RtmEvent};
pub use filter::FilterRegistry;
pub use identity::BotIdentity;
pub use message::IncomingMessage;
