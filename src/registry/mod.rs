//! Token registry for one import pass.
//!
//! Holds flattened definitions keyed by path in the order they were
//! committed, and resolves pending aliases against them.

mod resolver;

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::types::TokenDefinition;

pub use resolver::{resolve_aliases, Resolution};

/// Definitions keyed by their slash-joined path, in commit order.
///
/// Alias definitions always come after the definition they point to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSet {
    definitions: IndexMap<String, TokenDefinition>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a definition. Returns `false` and keeps the existing
    /// definition when the path is already taken.
    pub fn insert(&mut self, definition: TokenDefinition) -> bool {
        match self.definitions.entry(definition.path.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(definition);
                true
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&TokenDefinition> {
        self.definitions.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.definitions.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in commit order.
    pub fn iter(&self) -> impl Iterator<Item = &TokenDefinition> {
        self.definitions.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(|s| s.as_str())
    }
}

impl IntoIterator for TokenSet {
    type Item = TokenDefinition;
    type IntoIter = indexmap::map::IntoValues<String, TokenDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.into_values()
    }
}
