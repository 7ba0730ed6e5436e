//! # Conversation History
//!
//! Per-user rolling transcript fed back into `talk` prompts.
//! Bounded to `max_lines`; the oldest lines are dropped first.

use chrono::{DateTime, Local};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
struct HistoryLine {
    at: DateTime<Local>,
    text: String,
}

#[derive(Debug)]
pub struct ConversationHistory {
    max_lines: usize,
    users: HashMap<String, VecDeque<HistoryLine>>,
}

impl ConversationHistory {
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines,
            users: HashMap::new(),
        }
    }

    pub fn push(&mut self, user: &str, text: impl Into<String>) {
        if self.max_lines == 0 {
            return;
        }
        let lines = self.users.entry(user.to_string()).or_default();
        lines.push_back(HistoryLine {
            at: Local::now(),
            text: text.into(),
        });
        while lines.len() > self.max_lines {
            lines.pop_front();
        }
    }

    /// The user's transcript, oldest first, rendered for a prompt.
    pub fn lines(&self, user: &str) -> Vec<String> {
        self.users
            .get(user)
            .map(|lines| {
                lines
                    .iter()
                    .map(|l| format!("[{}] {}", l.at.format("%H:%M"), l.text))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn len(&self, user: &str) -> usize {
        self.users.get(user).map_or(0, VecDeque::len)
    }
}
