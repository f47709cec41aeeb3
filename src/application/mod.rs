//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Bot session orchestration
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing, dispatching, event routing

pub mod errors;
pub mod messaging;
pub mod services;
