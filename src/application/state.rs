//! # Bot State
//!
//! The process-wide state handed to the router: dictionary, admin set, rate limiters,
//! pending confirmations and conversation history. Built once at startup and shared as
//! `Arc<BotState>`. Each mutable part has its own lock so a handler waiting on a
//! confirmation never blocks lookups or other users' commands.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tokio::sync::Mutex;

use crate::application::confirmation::ConfirmationGate;
use crate::application::dictionary::Dictionary;
use crate::application::error::{CommandError, CommandResult};
use crate::application::history::ConversationHistory;
use crate::application::rate_limiter::RateLimiter;
use crate::domain::config::{BotConfig, RateLimitConfig};

/// Identities allowed to mutate the dictionary. Read-only after startup.
#[derive(Debug, Default, Clone)]
pub struct AdminSet {
    ids: HashSet<String>,
}

impl AdminSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ids: ids
                .into_iter()
                .map(|id| id.as_ref().trim().to_lowercase())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }

    /// Reads an admin file: a JSON array of identities, or an object keyed by identity.
    /// A missing or malformed file is logged and contributes nobody.
    pub fn load(path: &Path) -> Self {
        let parsed = fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str::<serde_json::Value>(&content)?));

        let ids: Vec<String> = match parsed {
            Ok(serde_json::Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| match v {
                    serde_json::Value::String(s) => Some(s),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            Ok(serde_json::Value::Object(map)) => map.into_iter().map(|(k, _)| k).collect(),
            Ok(_) => {
                tracing::error!("Admin file {} is neither a list nor an object", path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Error loading admin file {}: {}", path.display(), e);
                Vec::new()
            }
        };
        tracing::info!("Admin users loaded ({})", ids.len());
        Self::new(ids)
    }

    pub fn merge(mut self, other: AdminSet) -> Self {
        self.ids.extend(other.ids);
        self
    }

    pub fn is_admin(&self, sender: &str) -> bool {
        self.ids.contains(&sender.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Metered commands, each with its own limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metered {
    Translate,
    Talk,
    Random,
}

pub struct RateLimiters {
    translate: Mutex<RateLimiter>,
    talk: Mutex<RateLimiter>,
    random: Mutex<RateLimiter>,
}

impl RateLimiters {
    pub fn from_config(config: &BotConfig) -> Self {
        let build = |kind: Metered, limit: &RateLimitConfig| {
            let limiter = RateLimiter::from_config(limit);
            tracing::debug!(
                "{:?} limiter: {} calls per {:?}",
                kind,
                limiter.limit(),
                limiter.window()
            );
            Mutex::new(limiter)
        };
        Self {
            translate: build(Metered::Translate, &config.rate_limits.translate),
            talk: build(Metered::Talk, &config.rate_limits.talk),
            random: build(Metered::Random, &config.rate_limits.random),
        }
    }

    fn get(&self, kind: Metered) -> &Mutex<RateLimiter> {
        match kind {
            Metered::Translate => &self.translate,
            Metered::Talk => &self.talk,
            Metered::Random => &self.random,
        }
    }

    /// Admits a call or returns `RateLimited` with the time until the next free slot.
    pub async fn admit(&self, kind: Metered, user: &str) -> CommandResult<()> {
        let now = tokio::time::Instant::now().into_std();
        let mut limiter = self.get(kind).lock().await;
        if limiter.admit(user, now) {
            return Ok(());
        }
        let retry_after = limiter.retry_after(user, now).unwrap_or_default();
        tracing::info!("{:?} rate limit hit by {}", kind, user);
        Err(CommandError::RateLimited { retry_after })
    }
}

pub struct BotState {
    pub dictionary: Mutex<Dictionary>,
    pub admins: AdminSet,
    pub limiters: RateLimiters,
    pub confirmations: ConfirmationGate,
    pub history: Mutex<ConversationHistory>,
}

impl BotState {
    pub fn new(dictionary: Dictionary, admins: AdminSet, config: &BotConfig) -> Self {
        Self {
            dictionary: Mutex::new(dictionary),
            admins,
            limiters: RateLimiters::from_config(config),
            confirmations: ConfirmationGate::new(),
            history: Mutex::new(ConversationHistory::new(config.max_history_lines)),
        }
    }

    /// Loads the dictionary and admin list named in `config`.
    pub fn load(config: &BotConfig) -> Self {
        let dictionary = Dictionary::load(&config.dictionary_path);
        let mut admins = AdminSet::new(&config.admins);
        if let Some(path) = &config.admins_path {
            admins = admins.merge(AdminSet::load(Path::new(path)));
        }
        tracing::info!(
            "State ready: {} dictionary keys from {}, {} admins",
            dictionary.len(),
            dictionary.path().display(),
            admins.len()
        );
        Self::new(dictionary, admins, config)
    }
}
