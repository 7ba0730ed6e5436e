//! # Dictionary Store
//!
//! The key→phrase mapping behind lookups, `list` and `random`.
//! Keys are case-folded on every access. The mapping is written to disk as a JSON object
//! after each mutation, going through a temporary file and a rename so an interrupted
//! write never leaves a truncated dictionary behind.

use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::error::CommandError;

pub struct Dictionary {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

impl Dictionary {
    /// An empty, unsaved dictionary bound to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Loads the dictionary from `path`. A missing or unreadable file yields an empty
    /// dictionary; the error is logged and the caller carries on.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => {
                tracing::info!("Dictionary loaded from {} ({} keys)", path.display(), entries.len());
                entries
            }
            Err(e) => {
                tracing::error!("Error loading dictionary {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    /// Inserts or overwrites `key`, then saves. The in-memory value is kept even when
    /// the save fails.
    pub fn put(&mut self, key: &str, value: &str) -> Result<(), CommandError> {
        self.entries
            .insert(normalize_key(key), value.trim().to_string());
        self.save()
    }

    /// Removes `key`, then saves. Returns the old value, `None` if the key was absent
    /// (in which case nothing is written).
    pub fn remove(&mut self, key: &str) -> Result<Option<String>, CommandError> {
        let removed = self.entries.remove(&normalize_key(key));
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn random_entry<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .choose(rng)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes the whole mapping to disk.
    pub fn save(&self) -> Result<(), CommandError> {
        match write_entries(&self.path, &self.entries) {
            Ok(()) => {
                tracing::info!("Successfully saved dictionary {}", self.path.display());
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error saving dictionary {}: {}", self.path.display(), e);
                Err(CommandError::Persistence {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

fn read_entries(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)?;
    let raw: BTreeMap<String, String> = serde_json::from_str(&content)?;
    // Files written by hand may carry mixed-case keys
    Ok(raw
        .into_iter()
        .map(|(k, v)| (normalize_key(&k), v))
        .collect())
}

fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(entries)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
