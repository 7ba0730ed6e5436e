//! # Domain Traits
//!
//! The two collaborators the bot reaches through narrow interfaces: the chat room it
//! answers in and the text generator behind `translate` / `talk`.
//! Matrix and the hosted LLM APIs implement them in the Infrastructure layer; tests use mocks.

use async_trait::async_trait;

/// One room on a chat platform, seen from the bot.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Post a message to the room, returning the new event ID
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Post a message threaded onto `in_reply_to`
    async fn send_reply(&self, in_reply_to: &str, content: &str) -> Result<String, String>;

    /// Show or clear the typing indicator
    async fn typing(&self, active: bool) -> Result<(), String>;

    fn room_id(&self) -> String;
}

/// Text generation backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a single prompt. The error is shown to the user.
    async fn completion(&self, prompt: &str) -> Result<String, String>;
}
