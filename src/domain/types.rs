//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

/// A message handed over by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender: String,
    pub body: String,
    /// The message this one replies to, if any.
    pub reply_to: Option<RepliedMessage>,
}

impl InboundMessage {
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            reply_to: None,
        }
    }

    pub fn replying_to(mut self, event_id: impl Into<String>, body: impl Into<String>) -> Self {
        self.reply_to = Some(RepliedMessage {
            event_id: event_id.into(),
            body: body.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepliedMessage {
    pub event_id: String,
    pub body: String,
}

/// Language the persona answers in for `talk` / `entalk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TalkLanguage {
    Patois,
    English,
}

/// A fully classified command with its argument extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lookup { key: String },
    Add { key: String, value: String },
    Remove { key: String },
    Edit { key: String, value: String },
    List,
    Random,
    Translate { text: String },
    Talk {
        text: String,
        /// Text of the replied-to message when the user also typed their own line.
        quoted: Option<String>,
        language: TalkLanguage,
    },
    Help,
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Lookup { .. } => "lookup",
            Command::Add { .. } => "add",
            Command::Remove { .. } => "remove",
            Command::Edit { .. } => "edit",
            Command::List => "list",
            Command::Random => "random",
            Command::Translate { .. } => "translate",
            Command::Talk { .. } => "talk",
            Command::Help => "help",
        }
    }
}
