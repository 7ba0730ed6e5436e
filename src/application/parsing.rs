//! # Command Parsing
//!
//! Turns the raw text of an inbound message into a `Command`.
//!
//! Reserved verbs (and their aliases) are matched first. A message that is a single
//! unreserved token is a dictionary lookup for that token; several words behind an
//! unknown first token are not addressed to the bot and are ignored. When a message
//! replies to another and carries no argument, the replied-to text stands in for the
//! argument of `lookup`, `translate` and `talk`.

use crate::application::error::CommandError;
use crate::domain::types::{Command, RepliedMessage, TalkLanguage};
use crate::strings::messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Lookup,
    Add,
    Remove,
    Edit,
    Translate,
    Talk(TalkLanguage),
    Random,
    List,
    Help,
}

fn verb(token: &str) -> Option<Verb> {
    let verb = match token {
        "lookup" | "cmd" => Verb::Lookup,
        "add" | "ja" | "jadd" | "add_dict" => Verb::Add,
        "remove" | "jr" | "jrm" | "jrem" | "jremove" | "rm_dict" => Verb::Remove,
        "edit" | "je" | "jed" | "jedit" => Verb::Edit,
        "translate" | "bombocord" => Verb::Translate,
        "talk" => Verb::Talk(TalkLanguage::Patois),
        "entalk" => Verb::Talk(TalkLanguage::English),
        "random" | "r" | "roulette" => Verb::Random,
        "list" => Verb::List,
        "help" | "commands" | "info" | "bigup" => Verb::Help,
        _ => return None,
    };
    Some(verb)
}

/// Splits off the first whitespace-delimited token; the remainder is trimmed.
fn split_first(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim()),
        None => (text, ""),
    }
}

fn missing_argument() -> CommandError {
    CommandError::user_input(messages::MISSING_ARGUMENT)
}

/// The typed argument, or the replied-to text when nothing was typed.
fn argument_or_reply(args: &str, reply: Option<&RepliedMessage>) -> Option<String> {
    if !args.is_empty() {
        return Some(args.to_string());
    }
    reply
        .map(|r| r.body.trim())
        .filter(|body| !body.is_empty())
        .map(str::to_string)
}

fn single_key(text: &str) -> Result<String, CommandError> {
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(key), None) => Ok(key.to_lowercase()),
        (None, _) => Err(missing_argument()),
        (Some(_), Some(_)) => Err(CommandError::user_input(messages::SINGLE_KEY_ONLY)),
    }
}

fn key_value(args: &str) -> Result<(String, String), CommandError> {
    let (key, value) = split_first(args);
    if key.is_empty() || value.is_empty() {
        return Err(missing_argument());
    }
    Ok((key.to_lowercase(), value.to_string()))
}

/// Classifies `body`. `Ok(None)` means the message is not addressed to the bot.
pub fn parse(
    body: &str,
    prefix: &str,
    reply: Option<&RepliedMessage>,
) -> Result<Option<Command>, CommandError> {
    let Some(rest) = body.trim().strip_prefix(prefix) else {
        return Ok(None);
    };
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(None);
    }

    let (head, args) = split_first(rest);
    let head = head.to_lowercase();

    let Some(verb) = verb(&head) else {
        // Not a verb: a lone token is a lookup key
        if args.is_empty() {
            return Ok(Some(Command::Lookup { key: head }));
        }
        // Prose that happens to start with the prefix (e.g. `*sigh* ...`)
        tracing::debug!("Ignoring unrecognized command '{}'", head);
        return Ok(None);
    };

    let command = match verb {
        Verb::Lookup => {
            let text = argument_or_reply(args, reply).ok_or_else(missing_argument)?;
            Command::Lookup {
                key: single_key(&text)?,
            }
        }
        Verb::Add => {
            let (key, value) = key_value(args)?;
            Command::Add { key, value }
        }
        Verb::Edit => {
            let (key, value) = key_value(args)?;
            Command::Edit { key, value }
        }
        Verb::Remove => Command::Remove {
            key: single_key(args)?,
        },
        Verb::Translate => {
            let text = argument_or_reply(args, reply)
                .ok_or_else(|| CommandError::user_input(messages::NOTHING_TO_TRANSLATE))?;
            Command::Translate { text }
        }
        Verb::Talk(language) => {
            let text = argument_or_reply(args, reply)
                .ok_or_else(|| CommandError::user_input(messages::NOTHING_TO_SAY))?;
            // Typed text plus a reply: keep the parent as context
            let quoted = if args.is_empty() {
                None
            } else {
                reply.map(|r| r.body.trim().to_string())
            };
            Command::Talk {
                text,
                quoted,
                language,
            }
        }
        Verb::Random => Command::Random,
        Verb::List => Command::List,
        Verb::Help => Command::Help,
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(body: &str) -> RepliedMessage {
        RepliedMessage {
            event_id: "$parent".to_string(),
            body: body.to_string(),
        }
    }

    fn ok(body: &str) -> Command {
        parse(body, "*", None).unwrap().unwrap()
    }

    fn user_error(body: &str) -> String {
        match parse(body, "*", None) {
            Err(CommandError::UserInput(msg)) => msg,
            other => panic!("expected user error for {body:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_single_token_is_lookup() {
        assert_eq!(ok("*irie"), Command::Lookup { key: "irie".into() });
        assert_eq!(ok("*  IRIE  "), Command::Lookup { key: "irie".into() });
        assert_eq!(ok("*lookup Irie"), Command::Lookup { key: "irie".into() });
        assert_eq!(ok("*cmd irie"), Command::Lookup { key: "irie".into() });
    }

    #[test]
    fn test_add_splits_key_and_value() {
        assert_eq!(
            ok("*add hello wah gwaan"),
            Command::Add {
                key: "hello".into(),
                value: "wah gwaan".into()
            }
        );
        assert_eq!(
            ok("*ja Hello  wah gwaan"),
            Command::Add {
                key: "hello".into(),
                value: "wah gwaan".into()
            }
        );
        assert_eq!(
            ok("*je hello big up\nyuhself"),
            Command::Edit {
                key: "hello".into(),
                value: "big up\nyuhself".into()
            }
        );
    }

    #[test]
    fn test_reserved_verbs_are_not_lookups() {
        assert_eq!(ok("*list"), Command::List);
        assert_eq!(ok("*roulette"), Command::Random);
        assert_eq!(ok("*r"), Command::Random);
        assert_eq!(ok("*info"), Command::Help);
        assert_eq!(ok("*RANDOM"), Command::Random);
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(user_error("*add"), messages::MISSING_ARGUMENT);
        assert_eq!(user_error("*add hello"), messages::MISSING_ARGUMENT);
        assert_eq!(user_error("*jr"), messages::MISSING_ARGUMENT);
        assert_eq!(user_error("*edit"), messages::MISSING_ARGUMENT);
        assert_eq!(user_error("*lookup"), messages::MISSING_ARGUMENT);
        assert_eq!(user_error("*bombocord"), messages::NOTHING_TO_TRANSLATE);
        assert_eq!(user_error("*talk"), messages::NOTHING_TO_SAY);
    }

    #[test]
    fn test_multi_token_keys_are_rejected() {
        assert_eq!(user_error("*jr two words"), messages::SINGLE_KEY_ONLY);
        assert_eq!(user_error("*lookup two words"), messages::SINGLE_KEY_ONLY);
    }

    #[test]
    fn test_unknown_multi_word_input_is_ignored() {
        assert_eq!(parse("*what is this", "*", None).unwrap(), None);
        assert_eq!(parse("*sigh* that bus late again", "*", None).unwrap(), None);
    }

    #[test]
    fn test_unprefixed_messages_are_ignored() {
        assert_eq!(parse("irie", "*", None).unwrap(), None);
        assert_eq!(parse("*", "*", None).unwrap(), None);
        assert_eq!(parse("  ", "*", None).unwrap(), None);
        assert_eq!(
            parse("!irie", "!", None).unwrap(),
            Some(Command::Lookup { key: "irie".into() })
        );
    }

    #[test]
    fn test_reply_substitutes_missing_argument() {
        let parent = reply("Good morning, how are you?");
        assert_eq!(
            parse("*bombocord", "*", Some(&parent)).unwrap().unwrap(),
            Command::Translate {
                text: "Good morning, how are you?".into()
            }
        );
        // Typed text wins over the parent
        assert_eq!(
            parse("*translate hi there", "*", Some(&parent)).unwrap().unwrap(),
            Command::Translate {
                text: "hi there".into()
            }
        );
        assert_eq!(
            parse("*lookup", "*", Some(&reply("Irie"))).unwrap().unwrap(),
            Command::Lookup { key: "irie".into() }
        );
        // An empty parent does not count as an argument
        assert!(parse("*bombocord", "*", Some(&reply("   "))).is_err());
    }

    #[test]
    fn test_talk_with_reply_and_text_keeps_parent_as_context() {
        let parent = reply("di bus late again");
        assert_eq!(
            parse("*entalk why though", "*", Some(&parent)).unwrap().unwrap(),
            Command::Talk {
                text: "why though".into(),
                quoted: Some("di bus late again".into()),
                language: TalkLanguage::English,
            }
        );
        assert_eq!(
            parse("*talk", "*", Some(&parent)).unwrap().unwrap(),
            Command::Talk {
                text: "di bus late again".into(),
                quoted: None,
                language: TalkLanguage::Patois,
            }
        );
    }
}
