//! # Command Handlers
//!
//! Contains the handler functions for each supported command (lookup, admin edits,
//! translate, talk, help). These handlers are invoked by the Router, which sends the
//! returned `Reply` and turns a `CommandError` into its user-facing message.

pub mod admin;
pub mod dictionary;
pub mod help;
pub mod translate;

/// What the router should post once a handler finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Threaded onto an existing event (the message the user replied to).
    Threaded { in_reply_to: String, text: String },
}

impl Reply {
    /// Threads onto `parent` when there is one, plain text otherwise.
    pub fn to_parent(parent: Option<&str>, text: impl Into<String>) -> Self {
        match parent {
            Some(id) => Reply::Threaded {
                in_reply_to: id.to_string(),
                text: text.into(),
            },
            None => Reply::Text(text.into()),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Reply::Text(text) | Reply::Threaded { text, .. } => text,
        }
    }
}
