//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration and credential loading
//! - Logging: Subscriber setup from the logging config file
//! - Adapters: Platform integrations (Slack, console)

pub mod adapters;
pub mod config;
pub mod logging;
