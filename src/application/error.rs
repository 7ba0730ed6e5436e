//! # Command Errors
//!
//! Failures a command handler can end in. Every variant is turned into a reply at the
//! router boundary; none of them is allowed to escape to the transport loop.

use std::time::Duration;

use crate::strings::messages;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Missing or malformed argument, unknown key.
    #[error("{0}")]
    UserInput(String),

    #[error("{sender} is not an admin")]
    Unauthorized { sender: String },

    #[error("rate limited, retry in {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// The generative-language provider failed or timed out.
    #[error("{0}")]
    External(String),

    #[error("failed to persist {path}: {message}")]
    Persistence { path: String, message: String },
}

impl CommandError {
    pub fn user_input(message: impl Into<String>) -> Self {
        CommandError::UserInput(message.into())
    }

    /// The text shown in the room for this failure.
    pub fn user_message(&self) -> String {
        match self {
            CommandError::UserInput(message) => message.clone(),
            CommandError::Unauthorized { .. } => messages::AUTH_DENIED.to_string(),
            CommandError::RateLimited { retry_after } => messages::slow_down(*retry_after),
            CommandError::External(detail) => messages::llm_error(detail),
            CommandError::Persistence { .. } => messages::SAVE_FAILED.to_string(),
        }
    }

    /// Whether the failure is worth an error-level log line.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CommandError::External(_) | CommandError::Persistence { .. }
        )
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
