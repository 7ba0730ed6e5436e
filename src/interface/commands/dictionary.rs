//! # Dictionary Commands
//!
//! Handles lookups, `list` and `random`. Open to everyone; `random` is rate limited by
//! the router.

use crate::application::error::{CommandError, CommandResult};
use crate::application::state::BotState;
use crate::interface::commands::Reply;
use crate::strings::messages;

pub async fn handle_lookup(
    state: &BotState,
    key: &str,
    parent: Option<&str>,
) -> CommandResult<Reply> {
    let dictionary = state.dictionary.lock().await;
    match dictionary.get(key) {
        Some(value) => Ok(Reply::to_parent(parent, value)),
        None => Err(CommandError::user_input(messages::key_not_found(key))),
    }
}

pub async fn handle_list(state: &BotState) -> CommandResult<Reply> {
    let dictionary = state.dictionary.lock().await;
    if dictionary.is_empty() {
        return Ok(Reply::Text(messages::DICTIONARY_EMPTY.to_string()));
    }
    Ok(Reply::Text(messages::key_listing(&dictionary.keys())))
}

pub async fn handle_random(state: &BotState, parent: Option<&str>) -> CommandResult<Reply> {
    let picked = {
        let dictionary = state.dictionary.lock().await;
        dictionary
            .random_entry(&mut rand::rng())
            .map(|(k, v)| (k.to_string(), v.to_string()))
    };
    let Some((key, value)) = picked else {
        return Ok(Reply::Text(messages::DICTIONARY_EMPTY.to_string()));
    };

    tracing::info!("Roulette selected key: '{}'", key);
    Ok(Reply::to_parent(parent, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dictionary::Dictionary;
    use crate::application::state::AdminSet;
    use crate::domain::config::BotConfig;
    use tempfile::TempDir;

    fn state_with(dir: &TempDir, entries: &[(&str, &str)]) -> BotState {
        let mut dict = Dictionary::new(dir.path().join("dict.json"));
        for (k, v) in entries {
            dict.put(k, v).unwrap();
        }
        BotState::new(dict, AdminSet::default(), &BotConfig::default())
    }

    #[tokio::test]
    async fn test_lookup_hit_threads_onto_parent() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, &[("irie", "everyting criss")]);

        assert_eq!(
            handle_lookup(&state, "irie", None).await.unwrap(),
            Reply::Text("everyting criss".into())
        );
        assert_eq!(
            handle_lookup(&state, "IRIE", Some("$parent")).await.unwrap(),
            Reply::Threaded {
                in_reply_to: "$parent".into(),
                text: "everyting criss".into()
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_miss_is_not_found_message() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, &[]);
        let err = handle_lookup(&state, "nada", None).await.unwrap_err();
        assert_eq!(err.user_message(), messages::key_not_found("nada"));
    }

    #[tokio::test]
    async fn test_list() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, &[]);
        assert_eq!(
            handle_list(&state).await.unwrap().text(),
            messages::DICTIONARY_EMPTY
        );

        let state = state_with(&dir, &[("wah", "gwaan"), ("irie", "cool")]);
        assert_eq!(handle_list(&state).await.unwrap().text(), "`irie`, `wah`");
    }

    #[tokio::test]
    async fn test_random_threads_onto_parent() {
        let dir = TempDir::new().unwrap();
        let state = state_with(&dir, &[]);
        assert_eq!(
            handle_random(&state, None).await.unwrap().text(),
            messages::DICTIONARY_EMPTY
        );

        let state = state_with(&dir, &[("irie", "cool")]);
        assert_eq!(
            handle_random(&state, Some("$parent")).await.unwrap(),
            Reply::Threaded {
                in_reply_to: "$parent".into(),
                text: "cool".into()
            }
        );
    }
}
