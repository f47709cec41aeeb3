//! zuschauer-bot - a chat bot that answers commands addressed to it by mention

pub mod application;
pub mod domain;
pub mod infrastructure;
