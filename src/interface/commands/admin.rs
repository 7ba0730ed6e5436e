//! # Admin Commands
//!
//! Handles `add`, `remove` and `edit`. Only identities in the admin set may run them.
//! `remove` and `edit` overwrite or drop existing phrases, so they go through the
//! confirmation gate first; the dictionary is not locked while the gate waits.

use crate::application::confirmation::Outcome;
use crate::application::error::{CommandError, CommandResult};
use crate::application::state::BotState;
use crate::domain::config::BotConfig;
use crate::domain::traits::ChatProvider;
use crate::interface::commands::Reply;
use crate::strings::messages;

fn require_admin(state: &BotState, sender: &str) -> CommandResult<()> {
    if state.admins.is_admin(sender) {
        return Ok(());
    }
    tracing::warn!("Non-admin {} attempted a dictionary edit", sender);
    Err(CommandError::Unauthorized {
        sender: sender.to_string(),
    })
}

async fn require_existing(state: &BotState, key: &str) -> CommandResult<()> {
    if state.dictionary.lock().await.contains(key) {
        Ok(())
    } else {
        Err(CommandError::user_input(messages::key_not_found(key)))
    }
}

/// Asks the sender to confirm `action`, mapping a non-confirmation to its reply.
async fn confirm(
    config: &BotConfig,
    state: &BotState,
    chat: &impl ChatProvider,
    sender: &str,
    action: &str,
) -> CommandResult<Option<Reply>> {
    let outcome = state
        .confirmations
        .request_confirmation(chat, sender, action, config.confirm_timeout())
        .await
        .map_err(|e| {
            tracing::info!("Rejected confirmation request from {}: {}", sender, e);
            CommandError::user_input(messages::CONFIRMATION_ALREADY_PENDING)
        })?;

    Ok(match outcome {
        Outcome::Confirmed => None,
        Outcome::Declined => Some(Reply::Text(messages::ACTION_CANCELLED.to_string())),
        Outcome::TimedOut => Some(Reply::Text(messages::CONFIRMATION_TIMEOUT.to_string())),
    })
}

pub async fn handle_add(
    config: &BotConfig,
    state: &BotState,
    sender: &str,
    key: &str,
    value: &str,
) -> CommandResult<Reply> {
    require_admin(state, sender)?;

    let mut dictionary = state.dictionary.lock().await;
    if dictionary.contains(key) {
        return Err(CommandError::user_input(messages::key_already_exists(
            &config.prefix,
            key,
        )));
    }
    dictionary.put(key, value)?;
    tracing::info!("{} added dictionary key '{}'", sender, key);
    Ok(Reply::Text(messages::key_added(key, value)))
}

pub async fn handle_remove(
    config: &BotConfig,
    state: &BotState,
    chat: &impl ChatProvider,
    sender: &str,
    key: &str,
) -> CommandResult<Reply> {
    require_admin(state, sender)?;
    require_existing(state, key).await?;

    if let Some(reply) = confirm(config, state, chat, sender, &format!("remove `{key}`")).await? {
        return Ok(reply);
    }

    // Another admin may have removed it while we waited
    let removed = state.dictionary.lock().await.remove(key)?;
    if removed.is_none() {
        return Err(CommandError::user_input(messages::key_not_found(key)));
    }
    tracing::info!("{} removed dictionary key '{}'", sender, key);
    Ok(Reply::Text(messages::key_removed(key)))
}

pub async fn handle_edit(
    config: &BotConfig,
    state: &BotState,
    chat: &impl ChatProvider,
    sender: &str,
    key: &str,
    value: &str,
) -> CommandResult<Reply> {
    require_admin(state, sender)?;
    require_existing(state, key).await?;

    if let Some(reply) = confirm(config, state, chat, sender, &format!("edit `{key}`")).await? {
        return Ok(reply);
    }

    {
        let mut dictionary = state.dictionary.lock().await;
        if !dictionary.contains(key) {
            return Err(CommandError::user_input(messages::key_not_found(key)));
        }
        dictionary.put(key, value)?;
    }
    tracing::info!("{} edited dictionary key '{}'", sender, key);
    Ok(Reply::Text(messages::key_edited(key, value)))
}
