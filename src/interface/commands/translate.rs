//! # Translate & Talk
//!
//! Handles `translate` (one-shot patois translation) and `talk`/`entalk` (persona chat
//! with per-user history). Both are metered; the router admits them before they get here,
//! so a rejected call never reaches the provider.

use std::sync::Arc;

use crate::application::error::{CommandError, CommandResult};
use crate::application::state::BotState;
use crate::domain::traits::{ChatProvider, LlmProvider};
use crate::domain::types::TalkLanguage;
use crate::interface::commands::Reply;
use crate::strings::prompts;

const BOT_NAME: &str = "Bombocord";

async fn generate(
    llm: &Arc<dyn LlmProvider>,
    chat: &impl ChatProvider,
    prompt: &str,
) -> CommandResult<String> {
    let _ = chat.typing(true).await;
    let response = llm.completion(prompt).await;
    let _ = chat.typing(false).await;

    response.map_err(|e| {
        tracing::error!("Generation failed: {}", e);
        CommandError::External(e)
    })
}

pub async fn handle_translate(
    llm: &Arc<dyn LlmProvider>,
    chat: &impl ChatProvider,
    text: &str,
) -> CommandResult<Reply> {
    let translation = generate(llm, chat, &prompts::translation_prompt(text)).await?;
    tracing::info!("Translation generated successfully");
    Ok(Reply::Text(translation))
}

pub async fn handle_talk(
    state: &BotState,
    llm: &Arc<dyn LlmProvider>,
    chat: &impl ChatProvider,
    sender: &str,
    text: &str,
    quoted: Option<&str>,
    language: TalkLanguage,
) -> CommandResult<Reply> {
    let history = state.history.lock().await.lines(sender);
    tracing::debug!("Talk from {} with {} history lines", sender, history.len());
    let prompt = prompts::talk_prompt(&history, quoted, sender, text, language);
    let answer = generate(llm, chat, &prompt).await?;

    {
        let mut history = state.history.lock().await;
        history.push(sender, format!("{sender} says: {text}"));
        history.push(sender, format!("{BOT_NAME}: {answer}"));
    }
    Ok(Reply::Text(answer))
}
