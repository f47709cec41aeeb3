//! Message handling - Event-driven command processing

pub mod dispatcher;
pub mod handlers;
pub mod parser;
pub mod router;

pub use dispatcher::{CommandDispatcher, CommandOutcome, Control};
pub use handlers::{ConnectedHandler, DisconnectingHandler, MessageHandler};
pub use parser::{parse_command, ParsedCommand};
pub use router::{Action, EventHandler, EventRouter, HandlerContext, Subscription};
