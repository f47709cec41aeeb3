//! Application services - Business logic orchestration

pub mod session;

pub use session::{BotSession, SessionSettings, StopReason};
