//! Shared translation cache
//!
//! One cache lives for the whole run. The dispatcher writes to it, the
//! orchestrator and every sheet worker read from it, all through the same
//! `Arc<dyn TranslationStore>`.

use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Concurrent source-text -> translated-text store.
///
/// Entries are filled once and never updated or evicted. Lookups return
/// `Option`; callers decide what to fall back to on a miss.
pub trait TranslationStore: Send + Sync {
    /// Translation for `key`, if one has been stored
    fn get(&self, key: &str) -> Option<String>;

    /// Store a translation. Returns false if `key` was already present, in
    /// which case the stored value is left untouched.
    fn put(&self, key: String, value: String) -> bool;

    /// Distinct keys from `keys` that have no stored translation, sorted
    fn missing(&self, keys: &[&str]) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored entry
    fn snapshot(&self) -> HashMap<String, String>;
}

/// Lock-protected in-memory cache
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl SharedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-filled with known translations
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }
}

impl TranslationStore for SharedCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: String, value: String) -> bool {
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, value);
        true
    }

    fn missing(&self, keys: &[&str]) -> Vec<String> {
        let entries = self.entries.read();
        keys.iter()
            .filter(|k| !entries.contains_key(**k))
            .map(|k| k.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().clone()
    }
}
