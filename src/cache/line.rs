//! Per-line translation cache
//!
//! Keyed by `(normalized text, target language)`. Entries never expire by
//! time; the tier is instead bounded by a fixed capacity, pruning the
//! oldest-inserted entries first. Re-translating an existing key
//! overwrites it.

use serde::{Deserialize, Serialize};

use crate::cache::store::{read_json, write_json, KeyValueStore};
use crate::text::normalize;

const LINE_CACHE_KEY: &str = "lyrics-translator-cache";

#[derive(Serialize, Deserialize, Clone, Debug)]
struct LineEntry {
    key: String,
    translation: String,
}

/// Insertion-ordered file layout; index 0 is the oldest entry.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct LineCacheFile {
    entries: Vec<LineEntry>,
}

/// Per-line translation store.
#[derive(Clone)]
pub struct LineCache<S: KeyValueStore> {
    store: S,
    capacity: usize,
}

impl<S: KeyValueStore> LineCache<S> {
    pub fn new(store: S, capacity: usize) -> Self {
        Self { store, capacity }
    }

    fn entry_key(text: &str, lang: &str) -> String {
        format!("{}|{}", normalize(text), lang)
    }

    fn load(&self) -> LineCacheFile {
        read_json(&self.store, LINE_CACHE_KEY).unwrap_or_default()
    }

    /// Cached translation for a line, if any.
    pub fn get(&self, text: &str, lang: &str) -> Option<String> {
        let key = Self::entry_key(text, lang);
        self.load()
            .entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.translation.clone())
    }

    /// Store a translation, overwriting any previous entry for the same
    /// key and pruning the oldest entries beyond capacity.
    pub fn insert(&self, text: &str, lang: &str, translation: &str) {
        let key = Self::entry_key(text, lang);
        let mut file = self.load();
        file.entries.retain(|e| e.key != key);
        file.entries.push(LineEntry {
            key,
            translation: translation.to_string(),
        });
        if file.entries.len() > self.capacity {
            let excess = file.entries.len() - self.capacity;
            file.entries.drain(..excess);
        }
        write_json(&self.store, LINE_CACHE_KEY, &file);
    }
}
