//! Named lookup tables that warn once per unknown key.

use std::collections::{HashMap, HashSet};
use tracing::warn;

/// A static table keyed by raw Bugzilla value.
///
/// Misses log a single warning per distinct key; the keys already reported
/// are tracked separately from the table contents.
#[derive(Debug, Clone)]
pub struct LookupTable<V> {
    name: &'static str,
    entries: HashMap<String, V>,
    warned: HashSet<String>,
}

impl<V> LookupTable<V> {
    /// Creates a table from `(key, value)` pairs.
    pub fn new<K, I>(name: &'static str, entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            name,
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            warned: HashSet::new(),
        }
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), value);
    }

    /// Looks up `key`, warning the first time an unknown key is seen.
    pub fn lookup(&mut self, key: &str) -> Option<&V> {
        if !self.entries.contains_key(key) {
            if self.warned.insert(key.to_string()) {
                warn!(table = self.name, value = key, "Unable to convert value");
            }
            return None;
        }
        self.entries.get(key)
    }

    /// Number of warnings emitted so far.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.warned.len()
    }
}
