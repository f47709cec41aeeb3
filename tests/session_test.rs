//! Bot session integration tests
//! Run with: cargo test --test session_test

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use zuschauer_bot::application::errors::BotError;
use zuschauer_bot::application::services::{BotSession, SessionSettings, StopReason};
use zuschauer_bot::domain::entities::{BotIdentity, CommandTable, IncomingMessage, RtmEvent};
use zuschauer_bot::domain::traits::{Bot, EventSource};

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// In-memory platform: fixed identity, scripted events, recorded posts
struct FakeBot {
    identity: Option<BotIdentity>,
    script: Mutex<Option<Vec<Result<RtmEvent, BotError>>>>,
    posts: Arc<Mutex<Vec<(String, String)>>>,
    closed: Arc<Mutex<bool>>,
}

impl FakeBot {
    fn new(events: Vec<RtmEvent>) -> Self {
        Self::with_script(events.into_iter().map(Ok).collect())
    }

    fn with_script(script: Vec<Result<RtmEvent, BotError>>) -> Self {
        Self {
            identity: Some(BotIdentity::new("UBOT")),
            script: Mutex::new(Some(script)),
            posts: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(false)),
        }
    }

    fn without_identity(mut self) -> Self {
        self.identity = None;
        self
    }

    fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().unwrap().clone()
    }
}

struct ScriptedSource {
    events: VecDeque<Result<RtmEvent, BotError>>,
    closed: Arc<Mutex<bool>>,
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn next_event(&mut self) -> Option<Result<RtmEvent, BotError>> {
        self.events.pop_front()
    }

    async fn close(&mut self) -> Result<(), BotError> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

#[async_trait]
impl Bot for FakeBot {
    async fn identify(&self) -> Result<BotIdentity, BotError> {
        self.identity
            .clone()
            .ok_or_else(|| BotError::Auth("auth.test: invalid_auth".to_string()))
    }

    async fn connect(&self) -> Result<Box<dyn EventSource>, BotError> {
        let events = self.script.lock().unwrap().take().unwrap_or_default();
        Ok(Box::new(ScriptedSource {
            events: events.into(),
            closed: self.closed.clone(),
        }))
    }

    async fn send_message(&self, channel: &str, text: &str) -> Result<String, BotError> {
        self.posts.lock().unwrap().push((channel.to_string(), text.to_string()));
        Ok("1.0".to_string())
    }

    fn platform(&self) -> &'static str {
        "fake"
    }
}

fn settings() -> SessionSettings {
    SessionSettings {
        bot_name: "zuschauer-bot".to_string(),
        default_channel: "#bot-test".to_string(),
    }
}

fn session(bot: &Arc<FakeBot>) -> BotSession {
    BotSession::new(bot.clone(), CommandTable::standard(), settings())
}

fn said(text: &str) -> RtmEvent {
    RtmEvent::Message(IncomingMessage::new("C1", text).with_user("UHUMAN"))
}

#[tokio::test]
async fn test_identity_resolved_from_platform() {
    ensure_init();
    let bot = Arc::new(FakeBot::new(vec![]));
    let mut session = session(&bot);

    let identity = session.start(None).await.unwrap();
    assert_eq!(identity.mention_token, "<@UBOT>");
    assert_eq!(session.router().len(), 3);
}

#[tokio::test]
async fn test_explicit_identity_skips_lookup() {
    ensure_init();
    let bot = Arc::new(FakeBot::new(vec![]).without_identity());
    let mut session = session(&bot);

    let identity = session.start(Some("UEXPLICIT".to_string())).await.unwrap();
    assert_eq!(identity.id, "UEXPLICIT");
}

#[tokio::test]
async fn test_unresolved_identity_is_fatal() {
    ensure_init();
    let bot = Arc::new(FakeBot::new(vec![]).without_identity());
    let mut session = session(&bot);

    let err = session.start(None).await.unwrap_err();
    assert!(matches!(err, BotError::Identity(_)));
    assert!(err.is_fatal_startup());
    assert!(!session.is_started());
}

#[tokio::test]
async fn test_post_before_start_is_an_error() {
    ensure_init();
    let bot = Arc::new(FakeBot::new(vec![]));
    let session = session(&bot);

    assert!(matches!(session.post_message("hi", None).await, Err(BotError::NotStarted)));
    let mut session = session;
    assert!(matches!(session.run().await, Err(BotError::NotStarted)));
    assert!(bot.posts().is_empty());
}

#[tokio::test]
async fn test_empty_post_is_noop() {
    ensure_init();
    let bot = Arc::new(FakeBot::new(vec![]));
    let mut session = session(&bot);
    session.start(None).await.unwrap();

    assert!(!session.post_message("", None).await.unwrap());
    assert!(!session.post_message("", Some("C9")).await.unwrap());
    assert!(bot.posts().is_empty());

    assert!(session.post_message("hello", None).await.unwrap());
    assert_eq!(bot.posts(), vec![("#bot-test".to_string(), "hello".to_string())]);
}

#[tokio::test]
async fn test_full_conversation() {
    ensure_init();
    let bot = Arc::new(FakeBot::new(vec![
        RtmEvent::Connected,
        said("just chatting, nothing for the bot"),
        said("<@UBOT> add \"Multi Word\" rust"),
        said("<@UBOT> list"),
        said("<@UBOT>"),
        RtmEvent::Other("user_typing".to_string()),
        said("<@UBOT> dance"),
        RtmEvent::Disconnecting,
    ]));
    let mut session = session(&bot);
    session.start(None).await.unwrap();

    let reason = session.run().await.unwrap();
    assert_eq!(reason, StopReason::StreamEnded);

    let posts = bot.posts();
    assert_eq!(
        posts,
        vec![
            ("#bot-test".to_string(), "zuschauer-bot is now online".to_string()),
            ("C1".to_string(), "Added 2 filter(s): multi word, rust".to_string()),
            ("C1".to_string(), "Current filters:\n  multi word: 0\n  rust: 0\n".to_string()),
            ("C1".to_string(), "Unknown command: \"dance\"".to_string()),
        ]
    );
    assert!(*bot.closed.lock().unwrap());
    assert!(session.router().is_empty());
    assert!(!session.is_started());
}

#[tokio::test]
async fn test_raise_does_not_stop_the_loop() {
    ensure_init();
    let bot = Arc::new(FakeBot::new(vec![said("<@UBOT> raise"), said("<@UBOT> help")]));
    let mut session = session(&bot);
    session.start(None).await.unwrap();

    assert_eq!(session.run().await.unwrap(), StopReason::StreamEnded);

    let posts = bot.posts();
    assert_eq!(posts.len(), 1);
    assert!(posts[0].1.starts_with("Available commands:"));
}

#[tokio::test]
async fn test_bad_frames_are_skipped() {
    ensure_init();
    let bot = Arc::new(FakeBot::with_script(vec![
        Err(BotError::Parse("expected value".to_string())),
        Ok(said("<@UBOT> ping")),
    ]));
    let mut session = session(&bot);
    session.start(None).await.unwrap();
    session.run().await.unwrap();

    let posts = bot.posts();
    assert_eq!(posts.len(), 1);
    assert!(posts[0].1.starts_with("zuschauer-bot has been up for"));
}

#[tokio::test]
async fn test_exit_posts_reply_then_stops() {
    ensure_init();
    let bot = Arc::new(FakeBot::new(vec![
        said("<@UBOT> quit"),
        said("<@UBOT> help"),
    ]));
    let mut session = session(&bot);
    session.start(None).await.unwrap();

    assert_eq!(session.run().await.unwrap(), StopReason::ShutdownRequested);
    assert_eq!(
        bot.posts(),
        vec![("C1".to_string(), "zuschauer-bot is shutting down".to_string())]
    );
    assert!(*bot.closed.lock().unwrap());
    assert!(session.router().is_empty());
    assert!(matches!(session.post_message("late", None).await, Err(BotError::NotStarted)));
}
