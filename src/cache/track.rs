//! Per-track lyrics cache
//!
//! Keyed by `(artist, title, language)`, holding the whole-song lyrics and
//! translation pair fetched from the backend. Entries expire after a fixed
//! TTL and the tier is capped, oldest track evicted first; a newer fetch
//! for the same key supersedes the old value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cache::store::{read_json, write_json, KeyValueStore};

const TRACK_CACHE_KEY: &str = "lyrics-translator-track-cache";

/// Whole-song lyrics and translation as returned by the backend.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TrackLyrics {
    #[serde(default)]
    pub lyrics: String,
    #[serde(default)]
    pub translation: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct TrackEntry {
    #[serde(flatten)]
    data: TrackLyrics,
    cached_at_ms: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct TrackCacheFile {
    entries: HashMap<String, TrackEntry>,
}

/// Per-track lyrics/translation store.
#[derive(Clone)]
pub struct TrackCache<S: KeyValueStore> {
    store: S,
    capacity: usize,
    ttl_ms: f64,
}

impl<S: KeyValueStore> TrackCache<S> {
    pub fn new(store: S, capacity: usize, ttl_ms: f64) -> Self {
        Self {
            store,
            capacity,
            ttl_ms,
        }
    }

    fn entry_key(artist: &str, title: &str, lang: &str) -> String {
        format!("{artist}|{title}|{lang}")
    }

    fn load(&self) -> TrackCacheFile {
        read_json(&self.store, TRACK_CACHE_KEY).unwrap_or_default()
    }

    /// Cached pair for a track, if present and within its TTL.
    pub fn get(&self, artist: &str, title: &str, lang: &str, now_ms: f64) -> Option<TrackLyrics> {
        let key = Self::entry_key(artist, title, lang);
        let file = self.load();
        let entry = file.entries.get(&key)?;
        if now_ms - entry.cached_at_ms > self.ttl_ms {
            log::debug!("track cache entry expired for {key}");
            return None;
        }
        Some(entry.data.clone())
    }

    /// Store a pair, evicting the oldest tracks beyond capacity.
    pub fn insert(&self, artist: &str, title: &str, lang: &str, data: TrackLyrics, now_ms: f64) {
        let key = Self::entry_key(artist, title, lang);
        let mut file = self.load();
        file.entries.insert(
            key,
            TrackEntry {
                data,
                cached_at_ms: now_ms,
            },
        );
        while file.entries.len() > self.capacity {
            let oldest = file
                .entries
                .iter()
                .min_by(|a, b| a.1.cached_at_ms.total_cmp(&b.1.cached_at_ms))
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    file.entries.remove(&k);
                }
                None => break,
            }
        }
        write_json(&self.store, TRACK_CACHE_KEY, &file);
    }
}
