//! Event handlers bound by the session at startup

use crate::application::errors::{BotError, CommandError};
use crate::domain::entities::RtmEvent;
use super::dispatcher::Control;
use super::router::{Action, EventHandler, HandlerContext};

/// Announces the bot once the realtime link is up
pub struct ConnectedHandler;

impl EventHandler for ConnectedHandler {
    fn name(&self) -> &'static str {
        "connected"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, _event: &RtmEvent) -> Result<Vec<Action>, BotError> {
        tracing::info!("{} is connected to the realtime server", ctx.identity);
        Ok(vec![Action::Post {
            channel: None,
            text: format!("{} is now online", ctx.bot_name),
        }])
    }
}

/// Message subtypes that are edits, bot output or channel bookkeeping.
/// Others such as `file_share` and `thread_broadcast` carry text a person typed.
const IGNORED_SUBTYPES: &[&str] = &[
    "bot_message",
    "message_changed",
    "message_deleted",
    "message_replied",
    "channel_join",
    "channel_leave",
    "channel_topic",
    "channel_purpose",
    "channel_name",
    "channel_archive",
    "channel_unarchive",
    "group_join",
    "group_leave",
    "group_topic",
    "group_purpose",
    "group_name",
    "group_archive",
    "group_unarchive",
    "pinned_item",
    "unpinned_item",
    "bot_add",
    "bot_remove",
];

/// Runs commands from messages that mention the bot
pub struct MessageHandler;

impl EventHandler for MessageHandler {
    fn name(&self) -> &'static str {
        "message"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &RtmEvent) -> Result<Vec<Action>, BotError> {
        let RtmEvent::Message(msg) = event else {
            return Ok(Vec::new());
        };

        let ignored_subtype = msg.subtype.as_deref().is_some_and(|st| IGNORED_SUBTYPES.contains(&st));
        if ignored_subtype || msg.user.as_deref() == Some(ctx.identity.id.as_str()) {
            tracing::debug!("[{}] Ignoring message subtype={:?} user={:?}", msg.channel, msg.subtype, msg.user);
            return Ok(Vec::new());
        }

        let Some(raw) = ctx.identity.command_text(&msg.text) else {
            tracing::debug!("[{}] Not addressed to {}", msg.channel, ctx.identity);
            return Ok(Vec::new());
        };

        let outcome = match ctx.dispatcher.handle(&raw, &msg.channel) {
            Ok(outcome) => outcome,
            Err(CommandError::EmptyCommand) => {
                tracing::debug!("[{}] {} mentioned without a command", msg.channel, ctx.identity);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut actions = vec![Action::Post {
            channel: Some(msg.channel.clone()),
            text: outcome.response,
        }];
        if outcome.control == Control::Shutdown {
            actions.push(Action::Shutdown);
        }
        Ok(actions)
    }
}

/// Logs that the connection is going away
pub struct DisconnectingHandler;

impl EventHandler for DisconnectingHandler {
    fn name(&self) -> &'static str {
        "disconnecting"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, _event: &RtmEvent) -> Result<Vec<Action>, BotError> {
        tracing::warn!("{} is disconnecting now", ctx.identity);
        Ok(Vec::new())
    }
}
