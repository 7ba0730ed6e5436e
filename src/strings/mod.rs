//! # Strings Module
//!
//! Centralizes user-facing strings, prompts, and help text.
//! Ensures consistency in messaging and easier updates.

pub mod help;
pub mod messages;
pub mod prompts;
