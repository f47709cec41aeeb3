//! Bot session - Startup, event loop and outbound posting

use std::sync::Arc;
use std::time::Instant;

use crate::application::errors::BotError;
use crate::application::messaging::{
    Action, CommandDispatcher, ConnectedHandler, DisconnectingHandler, EventRouter, HandlerContext,
    MessageHandler, Subscription,
};
use crate::domain::entities::{BotIdentity, CommandTable, EventKind, RtmEvent};
use crate::domain::traits::{Bot, EventSource};

/// Settings the session is constructed with
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub bot_name: String,
    pub default_channel: String,
}

/// Why the event loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The event source ran dry
    StreamEnded,
    /// An exit/quit command asked for it
    ShutdownRequested,
}

pub struct BotSession {
    bot: Arc<dyn Bot>,
    settings: SessionSettings,
    dispatcher: CommandDispatcher,
    router: EventRouter,
    identity: Option<BotIdentity>,
    outbound: Option<Arc<dyn Bot>>,
    subscriptions: Vec<Subscription>,
}

impl BotSession {
    pub fn new(bot: Arc<dyn Bot>, table: CommandTable, settings: SessionSettings) -> Self {
        let dispatcher = CommandDispatcher::new(table, settings.bot_name.clone());
        Self {
            bot,
            settings,
            dispatcher,
            router: EventRouter::new(),
            identity: None,
            outbound: None,
            subscriptions: Vec::new(),
        }
    }

    pub fn identity(&self) -> Option<&BotIdentity> {
        self.identity.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.outbound.is_some()
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Resolve identity, bind handlers and enable posting.
    ///
    /// Without an explicit id the platform is asked; failing that is fatal.
    pub async fn start(&mut self, bot_id: Option<String>) -> Result<BotIdentity, BotError> {
        if self.is_started() {
            return Err(BotError::Internal("session already started".to_string()));
        }

        let identity = match bot_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => BotIdentity::new(id.trim()),
            None => {
                let identity = self
                    .bot
                    .identify()
                    .await
                    .map_err(|e| BotError::Identity(e.to_string()))?;
                tracing::info!("My bot_id is {}", identity.id);
                identity
            }
        };

        self.subscriptions = vec![
            self.router.register(EventKind::ConnectionEstablished, Arc::new(ConnectedHandler)),
            self.router.register(EventKind::Message, Arc::new(MessageHandler)),
            self.router.register(EventKind::ConnectionClosing, Arc::new(DisconnectingHandler)),
        ];

        let table = self.dispatcher.table().clone();
        self.dispatcher = CommandDispatcher::new(table, self.settings.bot_name.clone())
            .with_started_at(Instant::now());
        self.identity = Some(identity.clone());
        self.outbound = Some(self.bot.clone());

        tracing::info!("{} started on {} as {}", self.settings.bot_name, self.bot.platform(), identity);
        Ok(identity)
    }

    /// Drive the event source until it ends or a shutdown is requested
    pub async fn run(&mut self) -> Result<StopReason, BotError> {
        if !self.is_started() {
            return Err(BotError::NotStarted);
        }

        let mut source = self.bot.connect().await?;
        tracing::info!("Waiting for things to happen ...");

        let reason = self.event_loop(&mut *source).await;

        if let Err(e) = source.close().await {
            tracing::warn!("Failed to close event source: {}", e);
        }
        self.dispose();

        tracing::info!("Done waiting for things ({:?})", reason);
        Ok(reason)
    }

    async fn event_loop(&mut self, source: &mut dyn EventSource) -> StopReason {
        while let Some(next) = source.next_event().await {
            let event = match next {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("Dropping unreadable event: {}", e);
                    continue;
                }
            };

            let actions = self.dispatch_event(&event);
            if self.perform(actions).await {
                return StopReason::ShutdownRequested;
            }
        }
        StopReason::StreamEnded
    }

    /// Run every handler bound to the event. Faults stay inside this event.
    fn dispatch_event(&mut self, event: &RtmEvent) -> Vec<Action> {
        let Some(kind) = event.kind() else {
            tracing::debug!("Unhandled event: {:?}", event);
            return Vec::new();
        };
        let Some(identity) = self.identity.as_ref() else {
            return Vec::new();
        };

        let mut actions = Vec::new();
        for handler in self.router.handlers_for(kind) {
            let mut ctx = HandlerContext {
                identity,
                bot_name: &self.settings.bot_name,
                dispatcher: &mut self.dispatcher,
            };
            match handler.handle(&mut ctx, event) {
                Ok(mut more) => actions.append(&mut more),
                Err(e) => tracing::error!("Handler {} failed on {}: {}", handler.name(), kind, e),
            }
        }
        actions
    }

    /// Post in order; returns true once a shutdown was requested
    async fn perform(&self, actions: Vec<Action>) -> bool {
        let mut shutdown = false;
        for action in actions {
            match action {
                Action::Post { channel, text } => {
                    if let Err(e) = self.post_message(&text, channel.as_deref()).await {
                        tracing::error!("Failed to post message: {}", e);
                    }
                }
                Action::Shutdown => shutdown = true,
            }
        }
        shutdown
    }

    fn dispose(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            self.router.unregister(subscription);
        }
        self.outbound = None;
    }

    /// Send `text` to `channel` (default channel when `None`).
    ///
    /// Empty text is a no-op returning `Ok(false)`.
    pub async fn post_message(&self, text: &str, channel: Option<&str>) -> Result<bool, BotError> {
        let outbound = self.outbound.as_ref().ok_or(BotError::NotStarted)?;
        if text.is_empty() {
            return Ok(false);
        }
        let channel = channel.unwrap_or(&self.settings.default_channel);
        outbound.send_message(channel, text).await?;
        Ok(true)
    }
}
