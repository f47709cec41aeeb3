//! Event router - Explicit handler registration per event type

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::domain::entities::{BotIdentity, EventKind, RtmEvent};
use super::dispatcher::CommandDispatcher;

/// Side effects a handler asks the session to perform, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Post `text`; `None` channel means the session's default channel
    Post { channel: Option<String>, text: String },
    Shutdown,
}

/// State a handler may read or touch while handling one event
pub struct HandlerContext<'a> {
    pub identity: &'a BotIdentity,
    pub bot_name: &'a str,
    pub dispatcher: &'a mut CommandDispatcher,
}

/// Callback bound to one event type. Must return promptly.
pub trait EventHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &RtmEvent) -> Result<Vec<Action>, BotError>;
}

/// Handle returned by `EventRouter::register`, given back to unregister
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a Subscription leaves the handler registered"]
pub struct Subscription {
    id: u64,
    kind: EventKind,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

struct Registration {
    id: u64,
    kind: EventKind,
    handler: Arc<dyn EventHandler>,
}

#[derive(Default)]
pub struct EventRouter {
    registrations: Vec<Registration>,
    next_id: u64,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        tracing::debug!("Registered handler {} for {}", handler.name(), kind);
        self.registrations.push(Registration { id, kind, handler });
        Subscription { id, kind }
    }

    /// Returns false if the subscription was already gone
    pub fn unregister(&mut self, subscription: Subscription) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != subscription.id);
        self.registrations.len() != before
    }

    /// Handlers bound to `kind`, in registration order
    pub fn handlers_for(&self, kind: EventKind) -> Vec<Arc<dyn EventHandler>> {
        self.registrations
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.handler.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}
