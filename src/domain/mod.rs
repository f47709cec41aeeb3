//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (CommandTable, BotIdentity, FilterRegistry, RtmEvent)
//! - Traits: Abstractions for infrastructure (Bot, EventSource)

pub mod entities;
pub mod traits;
