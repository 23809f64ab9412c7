//! Line alignment
//!
//! Maps visible vocal blocks onto a whole-song translation fetched
//! separately. Line boundaries in the rendered lyrics do not necessarily
//! match the fetched text, so each block is fuzzy-matched against the
//! source lines and the translated line is taken at the matched index.
//! Blocks that fail the match threshold are recorded as unmatched and fall
//! back to per-line translation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::VocalBlock;
use crate::text::normalize;

/// Minimum similarity score for a match to be accepted.
pub const MATCH_THRESHOLD: f32 = 0.4;

/// Score floor applied when one normalized line contains the other.
const CONTAINMENT_FLOOR: f32 = 0.7;

/// Tokens shorter than this carry no signal and are ignored.
const MIN_TOKEN_LEN: usize = 3;

/// Alignment result for one visible block, keyed by its normalized text.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LineAlignmentEntry {
    /// Translated line, present iff `matched`.
    pub translation: Option<String>,
    /// Similarity score in `[0, 1]`; `matched` implies at least
    /// [`MATCH_THRESHOLD`].
    pub confidence: f32,
    /// Whether the block was matched to a source line.
    pub matched: bool,
}

impl LineAlignmentEntry {
    fn unmatched() -> Self {
        Self {
            translation: None,
            confidence: 0.0,
            matched: false,
        }
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

fn significant_tokens(normalized: &str) -> Vec<&str> {
    // Character count, not byte length; accented two-letter words must be
    // dropped the same way ASCII ones are
    normalized
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_TOKEN_LEN)
        .collect()
}

/// Best-matching source-line index and score for one normalized block.
///
/// Exact normalized equality short-circuits at 1.0. Otherwise candidates
/// are scored by token overlap, `|common| / max(|a|, |b|)`, with the
/// containment floor applied when one string contains the other. Only a
/// strictly better score displaces the running best, so ties keep the
/// first-seen candidate.
fn best_match(normalized_block: &str, source_lines: &[&str]) -> Option<(usize, f32)> {
    let block_tokens = significant_tokens(normalized_block);
    let mut best: Option<(usize, f32)> = None;

    for (index, source) in source_lines.iter().enumerate() {
        let normalized_source = normalize(source);
        if normalized_block == normalized_source {
            return Some((index, 1.0));
        }

        let source_tokens = significant_tokens(&normalized_source);
        if block_tokens.is_empty() || source_tokens.is_empty() {
            continue;
        }

        let common = block_tokens
            .iter()
            .filter(|t| source_tokens.contains(t))
            .count();
        let mut score = common as f32 / block_tokens.len().max(source_tokens.len()) as f32;

        let contains = normalized_source.contains(normalized_block)
            || normalized_block.contains(&normalized_source);
        if contains {
            score = score.max(CONTAINMENT_FLOOR);
        }

        let running_best = best.map(|(_, s)| s).unwrap_or(0.0);
        if score > running_best && score > MATCH_THRESHOLD {
            best = Some((index, score));
        }
    }

    best
}

/// Align visible blocks against a whole-song source/translation pair.
///
/// Returns a map from normalized block text to its alignment entry. An
/// empty translated text yields an empty map immediately. The translated
/// line for a match is taken at the same index as the matched source line;
/// when the two texts segment differently the index can fall out of range,
/// which degrades to an unmatched entry rather than a wrong line.
pub fn align_lines<R>(
    source_full: &str,
    translated_full: &str,
    blocks: &[VocalBlock<R>],
) -> HashMap<String, LineAlignmentEntry> {
    let mut map = HashMap::new();
    if translated_full.trim().is_empty() {
        return map;
    }

    let source_lines = split_lines(source_full);
    let translated_lines = split_lines(translated_full);

    for block in blocks {
        let key = normalize(&block.text);
        let entry = match best_match(&key, &source_lines) {
            Some((index, score)) if index < translated_lines.len() => LineAlignmentEntry {
                translation: Some(translated_lines[index].to_string()),
                confidence: score,
                matched: true,
            },
            _ => LineAlignmentEntry::unmatched(),
        };
        map.insert(key, entry);
    }

    map
}
