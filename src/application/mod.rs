//! # Application Layer
//!
//! The bot's own logic: the dictionary store, rate limiting, the confirmation gate,
//! conversation history, command parsing and routing.

pub mod confirmation;
pub mod dictionary;
pub mod error;
pub mod history;
pub mod logging;
pub mod parsing;
pub mod rate_limiter;
pub mod router;
pub mod state;
