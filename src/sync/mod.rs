//! Reconciliation loop
//!
//! Keeps the injected overlays in step with the host's re-renders. The
//! loop itself is a plain state-owning struct driven over the
//! [`OverlayHost`] trait: the WASM driver implements it against the live
//! DOM, tests implement it against a fake. Network work is never performed
//! here; a pass returns the pending requests as data and the driver feeds
//! completions back through identity-keyed `complete_*` calls, so
//! out-of-order arrivals across track changes cannot corrupt a later
//! track's overlay.

use std::collections::HashMap;

use crate::align::{align_lines, LineAlignmentEntry};
use crate::cache::{KeyValueStore, LineCache, TrackCache, TrackLyrics};
use crate::config::Config;
use crate::extract::{content_checksum, extract_blocks};
use crate::models::{HostNode, TrackIdentity, VocalBlock};
use crate::text::normalize;

/// Host-side effects the reconciler drives.
///
/// All methods are infallible from the reconciler's point of view; the
/// implementation catches and logs its own failures so a bad DOM write can
/// never abort a pass.
pub trait OverlayHost {
    /// Live-tree reference type carried by snapshots and blocks.
    type Handle: Clone;

    /// Snapshot the current visual groups, one subtree per group.
    /// `None` (or an empty vector) means the lyrics UI is not ready.
    fn lyrics_groups(&mut self) -> Option<Vec<HostNode<Self::Handle>>>;

    /// Current track identity from the host player, if known.
    fn current_track(&mut self) -> Option<TrackIdentity>;

    /// Whether the given block is currently host-highlighted.
    fn is_block_active(&self, handle: &Self::Handle) -> bool;

    /// Insert or update-in-place the overlay directly after a block.
    fn upsert_overlay(
        &mut self,
        block: &VocalBlock<Self::Handle>,
        translation: Option<&str>,
        active: bool,
    );

    /// Patch the text of the overlay carrying `source_text` as its stable
    /// identity key. Returns false when no such overlay exists any more,
    /// in which case the completion is silently discarded.
    fn patch_overlay(&mut self, source_text: &str, translation: &str) -> bool;

    /// Re-derive the active/inactive visual state of every overlay.
    fn refresh_overlay_states(&mut self);

    /// Queue a scroll adjustment to re-center the active line.
    fn schedule_scroll_adjustment(&mut self);
}

/// Result of one reconciliation pass.
#[derive(Clone, Debug, PartialEq)]
pub enum PassOutcome {
    /// Lyrics container absent; nothing done, retried on next notification.
    NotReady,
    /// Content checksum and track unchanged; only visual state and scroll
    /// were refreshed.
    Unchanged,
    /// Overlays were (re)written. The driver owes the listed follow-ups.
    Updated {
        /// Block texts that need an asynchronous per-line translation.
        pending_lines: Vec<String>,
        /// Track to fetch a whole-song lyrics/translation pair for.
        track_fetch: Option<TrackIdentity>,
    },
}

/// The reconciliation state machine.
///
/// Owns everything the loop needs between passes: the last content
/// checksum, the current track, and the in-memory alignment map. There is
/// deliberately no other mutable state anywhere in the crate.
pub struct Reconciler<S: KeyValueStore> {
    config: Config,
    lines: LineCache<S>,
    tracks: TrackCache<S>,
    last_checksum: Option<String>,
    current_track: Option<TrackIdentity>,
    alignment: Option<HashMap<String, LineAlignmentEntry>>,
}

impl<S: KeyValueStore> Reconciler<S> {
    pub fn new(store: S, config: Config) -> Self {
        let lines = LineCache::new(store.clone(), config.line_cache_cap);
        let tracks = TrackCache::new(
            store,
            config.track_cache_cap,
            config.track_cache_ttl_ms,
        );
        Self {
            config,
            lines,
            tracks,
            last_checksum: None,
            current_track: None,
            alignment: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn target_language(&self) -> &str {
        &self.config.target_language
    }

    /// Change the target language; drops the alignment map and forces the
    /// next pass to re-translate.
    pub fn set_target_language(&mut self, lang: &str) {
        self.config.target_language = lang.to_string();
        self.alignment = None;
        self.last_checksum = None;
    }

    /// Track identity observed on the most recent pass.
    pub fn last_track(&self) -> Option<&TrackIdentity> {
        self.current_track.as_ref()
    }

    /// Run one full reconciliation pass.
    pub fn run_pass<H>(&mut self, host: &mut H, now_ms: f64) -> PassOutcome
    where
        H: OverlayHost,
    {
        let Some(groups) = host.lyrics_groups() else {
            return PassOutcome::NotReady;
        };
        if groups.is_empty() {
            return PassOutcome::NotReady;
        }

        let blocks = extract_blocks(&groups);
        let checksum = content_checksum(&blocks);
        let track = host.current_track();
        let lang = self.config.target_language.clone();

        let track_changed = self.current_track != track;
        let mut track_fetch = None;
        if track_changed {
            log::debug!("track changed: {:?} -> {:?}", self.current_track, track);
            self.current_track = track;
            self.alignment = None;
            if let Some(t) = self.current_track.as_ref().filter(|t| t.is_fetchable()) {
                if self.tracks.get(&t.artist, &t.title, &lang, now_ms).is_none() {
                    track_fetch = Some(t.clone());
                }
            }
        }

        if !track_changed && self.last_checksum.as_deref() == Some(checksum.as_str()) {
            host.refresh_overlay_states();
            host.schedule_scroll_adjustment();
            return PassOutcome::Unchanged;
        }
        self.last_checksum = Some(checksum);

        if self.alignment.is_none() {
            if let Some(t) = self.current_track.as_ref().filter(|t| t.is_fetchable()) {
                if let Some(pair) = self.tracks.get(&t.artist, &t.title, &lang, now_ms) {
                    if !pair.translation.is_empty() {
                        self.alignment =
                            Some(align_lines(&pair.lyrics, &pair.translation, &blocks));
                    }
                }
            }
        }

        let mut pending_lines: Vec<String> = Vec::new();
        for block in &blocks {
            let translation = self.translation_for(&block.text, &lang);
            if translation.is_none() && !pending_lines.iter().any(|p| p == &block.text) {
                pending_lines.push(block.text.clone());
            }
            let active = host.is_block_active(&block.handle);
            host.upsert_overlay(block, translation.as_deref(), active);
        }

        host.refresh_overlay_states();
        host.schedule_scroll_adjustment();

        PassOutcome::Updated {
            pending_lines,
            track_fetch,
        }
    }

    /// Resolve a block's translation from the alignment map or the
    /// per-line cache. `None` means a remote per-line request is needed.
    fn translation_for(&self, text: &str, lang: &str) -> Option<String> {
        if let Some(map) = &self.alignment {
            if let Some(entry) = map.get(&normalize(text)) {
                if entry.matched {
                    return entry.translation.clone();
                }
            }
        }
        self.lines.get(text, lang)
    }

    /// Apply a completed per-line translation.
    ///
    /// Caches the result and patches the matching overlay by stable
    /// identity. A completion whose overlay no longer exists (the track
    /// moved on, the host re-rendered) is a silent no-op apart from the
    /// cache write.
    pub fn complete_line_translation<H>(
        &mut self,
        host: &mut H,
        source_text: &str,
        translation: &str,
    ) where
        H: OverlayHost,
    {
        if translation.is_empty() {
            return;
        }
        let lang = self.config.target_language.clone();
        self.lines.insert(source_text, &lang, translation);
        if !host.patch_overlay(source_text, translation) {
            log::debug!("stale line translation discarded: {source_text:?}");
        }
    }

    /// Apply a completed whole-track fetch.
    ///
    /// Stores the pair in the track cache and, when the fetched track is
    /// still the current one, invalidates the checksum so the next pass
    /// recomputes the alignment map against it.
    pub fn complete_track_fetch(
        &mut self,
        track: &TrackIdentity,
        data: TrackLyrics,
        now_ms: f64,
    ) {
        let lang = self.config.target_language.clone();
        self.tracks
            .insert(&track.artist, &track.title, &lang, data, now_ms);
        if self.current_track.as_ref() == Some(track) {
            self.alignment = None;
            self.last_checksum = None;
        }
    }
}
