//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes error messages, confirmation prompts, and dictionary notifications.

use std::time::Duration;

pub const AUTH_DENIED: &str = "🚫 **Error**: You are not an admin.";
pub const MISSING_ARGUMENT: &str = "Yuh missing some tings dere, check the help command!";
pub const SINGLE_KEY_ONLY: &str = "Please use exactly one key!";
pub const NOTHING_TO_TRANSLATE: &str = "Gimme sumting fi translate nuh, bredren!";
pub const NOTHING_TO_SAY: &str = "Please provide a prompt or reply to a message.";
pub const DICTIONARY_EMPTY: &str = "Mi dictionary empty bredren!";
pub const SAVE_FAILED: &str =
    "⚠️ Mi cyaan save di dictionary right now. Di change deh yah fi dis session only.";
pub const CONFIRMATION_TIMEOUT: &str = "No confirmation received. Action cancelled.";
pub const ACTION_CANCELLED: &str = "Action cancelled.";
pub const CONFIRMATION_ALREADY_PENDING: &str =
    "⏳ Yuh already have a confirmation waiting. Answer dat one first.";

pub fn slow_down(retry_after: Duration) -> String {
    // Round up so a hint of "0 seconds" is never shown
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    format!("Easy nuh bredren! Yuh going too fast. Try again in {secs} seconds.")
}

pub fn llm_error(err: &str) -> String {
    format!("Yuh see mi bredren, I'm having some technical difficulties: {err}")
}

pub fn key_not_found(key: &str) -> String {
    format!("No translation found for `{key}`.")
}

pub fn key_already_exists(prefix: &str, key: &str) -> String {
    format!(
        "Key `{key}` already exists! Use `{prefix}jr {key}` to delete it, `{prefix}je {key} [new_value]` to edit it, or choose a different key."
    )
}

pub fn key_added(key: &str, value: &str) -> String {
    format!("Added `{key}`: `{value}` to Jamaican dictionary.")
}

pub fn key_removed(key: &str) -> String {
    format!("Removed `{key}` from Jamaican dictionary.")
}

pub fn key_edited(key: &str, value: &str) -> String {
    format!("Edited `{key}`: `{value}`.")
}

pub fn confirm_prompt(action: &str) -> String {
    format!("Are you sure you want to {action}? Reply with `yes` to confirm.")
}

pub fn key_listing(keys: &[&str]) -> String {
    keys.iter()
        .map(|k| format!("`{k}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_down_rounds_up() {
        assert!(slow_down(Duration::from_millis(200)).contains("in 1 seconds"));
        assert!(slow_down(Duration::from_secs(12)).contains("in 12 seconds"));
    }

    #[test]
    fn test_key_listing() {
        assert_eq!(key_listing(&["irie", "wah"]), "`irie`, `wah`");
        assert_eq!(key_listing(&[]), "");
    }
}
