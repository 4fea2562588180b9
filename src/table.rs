//! Keyword tables.
//!
//! A [`CommandTable`] maps lower-cased invoke keywords to descriptors and
//! enforces that a keyword is registered at most once. The command registry
//! and the help registry each own one; they are kept in step only by both
//! observing every registration event.

use crate::config::KeywordMatch;
use crate::error::RegistryError;
use herald_proto::CommandDescriptor;
use indexmap::IndexMap;

/// Insert-once map from keyword to descriptor, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: IndexMap<String, CommandDescriptor>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `descriptor` under its lower-cased keyword.
    ///
    /// An existing entry is left untouched and the new one is rejected.
    pub fn insert(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        let keyword = descriptor.keyword();
        if self.entries.contains_key(&keyword) {
            return Err(RegistryError::DuplicateKeyword(keyword));
        }
        self.entries.insert(keyword, descriptor);
        Ok(())
    }

    /// Find the descriptor a user token refers to.
    pub fn lookup(&self, token: &str, mode: KeywordMatch) -> Option<&CommandDescriptor> {
        self.entries.get(&*mode.key(token))
    }

    /// Exact lookup by stored key.
    pub fn get(&self, keyword: &str) -> Option<&CommandDescriptor> {
        self.entries.get(keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.contains_key(keyword)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandDescriptor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keywords in registration order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
