//! Line extraction
//!
//! Reconstructs one logical text line per vocal block from the host's
//! nested karaoke markup. The host renders the same line in several shapes
//! depending on sync granularity: a single pre-joined line node, per-word
//! nodes with syllable/letter children, or bare syllable fragments.
//! Instead of scattering class-list checks, every node is classified once
//! into a closed set of roles and reconstruction dispatches on that role.

use crate::models::{HostNode, VocalBlock, VoiceRole};
use crate::text::collapse_whitespace;

/// Closed set of node roles the extractor understands.
///
/// Classification happens once per node; all reconstruction logic
/// dispatches on the resulting variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
    /// A whole line pre-rendered as one unit (`Lyric Synced Line`).
    PrejoinedLine,
    /// A word container whose children are syllables or letters (`Word`).
    Word,
    /// A pre-joined syllable-line fragment (`Lyric Syllable Synced`).
    SyllableFragment,
    /// An emphasis group whose synced letters spell a fragment
    /// (`Emphasis`, usually with `Lyric Syllable`).
    EmphasisGroup,
    /// A single synced letter inside an emphasis group (`Letter Synced`).
    SyncedLetter,
    /// A vocal block container (`Vocals`), one per sung line.
    VocalBlock,
    /// A bare sub-word fragment (`Lyric`, `Syllable`, or `Letter` alone),
    /// only meaningful as a child of a `Word`.
    Fragment,
    /// Anything else; contributes no text.
    Other,
}

fn has_class(classes: &str, name: &str) -> bool {
    classes.split_whitespace().any(|c| c == name)
}

/// Classify a node by its class attribute.
pub fn classify(classes: &str) -> NodeClass {
    let has = |name: &str| has_class(classes, name);
    if has("Lyric") && has("Synced") && has("Line") {
        NodeClass::PrejoinedLine
    } else if has("Word") {
        NodeClass::Word
    } else if has("Emphasis") {
        NodeClass::EmphasisGroup
    } else if has("Lyric") && has("Syllable") && has("Synced") {
        NodeClass::SyllableFragment
    } else if has("Letter") && has("Synced") {
        NodeClass::SyncedLetter
    } else if has("Vocals") {
        NodeClass::VocalBlock
    } else if has("Lyric") || has("Syllable") || has("Letter") {
        NodeClass::Fragment
    } else {
        NodeClass::Other
    }
}

/// Concatenate the text of all synced-letter descendants in document order.
fn synced_letters<R>(node: &HostNode<R>) -> String {
    let mut out = String::new();
    collect_synced_letters(node, &mut out);
    out
}

fn collect_synced_letters<R>(node: &HostNode<R>, out: &mut String) {
    for child in &node.children {
        if classify(&child.classes) == NodeClass::SyncedLetter {
            out.push_str(child.text.trim());
        }
        collect_synced_letters(child, out);
    }
}

/// Reconstruct a word by concatenating its sub-character nodes in order.
///
/// Syllables and letters concatenate without separators; an emphasis group
/// contributes its synced letters.
fn reconstruct_word<R>(word: &HostNode<R>) -> String {
    let mut out = String::new();
    for child in &word.children {
        match classify(&child.classes) {
            NodeClass::SyllableFragment | NodeClass::Fragment | NodeClass::SyncedLetter => {
                out.push_str(child.text.trim());
            }
            NodeClass::EmphasisGroup => out.push_str(&synced_letters(child)),
            _ => {}
        }
    }
    out
}

/// First pre-joined line node anywhere under `node`, in document order.
fn find_prejoined_line<'a, R>(node: &'a HostNode<R>) -> Option<&'a HostNode<R>> {
    for child in &node.children {
        if classify(&child.classes) == NodeClass::PrejoinedLine {
            return Some(child);
        }
        if let Some(found) = find_prejoined_line(child) {
            return Some(found);
        }
    }
    None
}

/// Reconstruct the text of one vocal block element.
fn block_text<R>(block: &HostNode<R>) -> String {
    // Strategy 1: the host pre-rendered the whole line as one node.
    if let Some(line) = find_prejoined_line(block) {
        return collapse_whitespace(line.text.trim());
    }

    // Strategy 2: walk direct children and reconstruct word by word.
    let mut words: Vec<String> = Vec::new();
    for child in &block.children {
        match classify(&child.classes) {
            NodeClass::Word => {
                let word = reconstruct_word(child);
                if !word.is_empty() {
                    words.push(word);
                }
            }
            NodeClass::SyllableFragment => {
                let fragment = child.text.trim();
                if !fragment.is_empty() {
                    words.push(fragment.to_string());
                }
            }
            NodeClass::EmphasisGroup => {
                let letters = synced_letters(child);
                if !letters.is_empty() {
                    words.push(letters);
                }
            }
            _ => {}
        }
    }
    collapse_whitespace(&words.join(" "))
}

/// Collect every descendant matching one of the known text-bearing roles,
/// in document order. Used by the wildcard fallback.
fn collect_wildcard<'a, R>(node: &'a HostNode<R>, out: &mut Vec<&'a HostNode<R>>) {
    for child in &node.children {
        match classify(&child.classes) {
            NodeClass::PrejoinedLine
            | NodeClass::Word
            | NodeClass::SyllableFragment
            | NodeClass::EmphasisGroup => out.push(child),
            _ => {}
        }
        collect_wildcard(child, out);
    }
}

/// Extract vocal blocks from one visual group.
fn extract_group<R: Clone>(group: &HostNode<R>) -> Vec<VocalBlock<R>> {
    let mut blocks: Vec<VocalBlock<R>> = Vec::new();

    for child in &group.children {
        if classify(&child.classes) != NodeClass::VocalBlock {
            continue;
        }
        let text = block_text(child);
        if text.is_empty() {
            continue;
        }
        blocks.push(VocalBlock {
            handle: child.handle.clone(),
            text,
            role: VoiceRole::from_classes(&child.classes),
            is_last: false,
        });
    }

    // Strategy 3: nothing classified at the block level; scan the whole
    // group for any known text-bearing node and treat it as one block.
    if blocks.is_empty() {
        let mut nodes = Vec::new();
        collect_wildcard(group, &mut nodes);
        let mut words: Vec<String> = Vec::new();
        for node in nodes {
            let piece = match classify(&node.classes) {
                NodeClass::PrejoinedLine | NodeClass::SyllableFragment => {
                    node.text.trim().to_string()
                }
                NodeClass::Word => reconstruct_word(node),
                NodeClass::EmphasisGroup => synced_letters(node),
                _ => String::new(),
            };
            if !piece.is_empty() {
                words.push(piece);
            }
        }
        let text = collapse_whitespace(&words.join(" "));
        if !text.is_empty() {
            blocks.push(VocalBlock {
                handle: group.handle.clone(),
                text,
                role: VoiceRole::from_classes(&group.classes),
                is_last: false,
            });
        }
    }

    if let Some(last) = blocks.last_mut() {
        last.is_last = true;
    }
    blocks
}

/// Extract vocal blocks from an ordered sequence of visual groups.
///
/// An empty input (host UI not ready) yields an empty vector, not an
/// error; the caller retries on the next mutation notification.
pub fn extract_blocks<R: Clone>(groups: &[HostNode<R>]) -> Vec<VocalBlock<R>> {
    let mut blocks = Vec::new();
    for group in groups {
        blocks.extend(extract_group(group));
    }
    blocks
}

/// Cheap content fingerprint over the extracted block texts.
///
/// Used by the reconciliation loop to skip re-processing when a mutation
/// batch did not actually change any visible text.
pub fn content_checksum<R>(blocks: &[VocalBlock<R>]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("||")
}
