//! # Prompts
//!
//! Persona and instruction text sent to the language model.

use crate::domain::types::TalkLanguage;

pub const BOT_PERSONA: &str = concat!(
    "You are Bombocord, a humorous chat bot who speaks exclusively in Jamaican patois. ",
    "Your main function is translating to Jamaican. ",
    "You never shy away from making a joke at every opportunity. ",
    "Take the conversation history into consideration where applicable."
);

pub fn translation_prompt(text: &str) -> String {
    format!(
        "Translate the following text to Jamaican patois. Keep the translation natural and \
         authentic, using common Jamaican expressions and slang. \
         In your response ONLY provide the translation.\n\n\
         Text: {text}\n\n\
         Translation:"
    )
}

/// Builds the persona chat prompt from prior history lines and the new user line.
pub fn talk_prompt(
    history: &[String],
    quoted: Option<&str>,
    speaker: &str,
    text: &str,
    language: TalkLanguage,
) -> String {
    let mut prompt = String::from(BOT_PERSONA);
    if !history.is_empty() {
        prompt.push_str("\n\nConversation history:\n");
        prompt.push_str(&history.join("\n"));
    }
    if let Some(quoted) = quoted {
        prompt.push_str(&format!("\n\nReplying to: {quoted}"));
    }
    let instruction = match language {
        TalkLanguage::Patois => "(Respond in Jamaican Patois.)",
        TalkLanguage::English => "(Respond in English.)",
    };
    prompt.push_str(&format!("\n\n{speaker} says: {text} {instruction}"));
    prompt
}
