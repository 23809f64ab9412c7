//! Vocal blocks and host-tree snapshots
//!
//! A `VocalBlock` is one reconstructed logical line of sung text attributed
//! to a single voice role. Blocks are recreated on every reconciliation
//! pass from a `HostNode` snapshot of the live lyrics tree; a fresh set
//! replaces the prior set each pass, nothing is mutated in place.

use serde::{Deserialize, Serialize};

/// Voice role of a vocal block, derived from the host's class metadata.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceRole {
    /// Main vocal line.
    Lead,
    /// Background / secondary vocals.
    Background,
    /// Anything the host does not mark explicitly.
    Other,
}

impl VoiceRole {
    /// Derive the role from a class-attribute string, case-insensitively.
    pub fn from_classes(classes: &str) -> Self {
        let lowered = classes.to_lowercase();
        if lowered.contains("lead") {
            VoiceRole::Lead
        } else if lowered.contains("background") || lowered.contains("bg") {
            VoiceRole::Background
        } else {
            VoiceRole::Other
        }
    }
}

/// Owned snapshot of one node in the host's rendered lyrics tree.
///
/// The DOM adapter materializes each visual group into this shape once per
/// pass, so extraction runs on stable data while the live tree keeps
/// mutating underneath. `handle` points back at the live element (or at a
/// synthetic id in tests) and is only valid until the next mutation.
#[derive(Clone, Debug)]
pub struct HostNode<R> {
    /// Reference into the live tree, used for overlay insertion.
    pub handle: R,
    /// Space-separated class attribute, as rendered.
    pub classes: String,
    /// Full text content of the subtree, trimmed.
    pub text: String,
    /// Element children in document order.
    pub children: Vec<HostNode<R>>,
}

impl<R> HostNode<R> {
    pub fn new(handle: R, classes: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            handle,
            classes: classes.into(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Builder-style child attachment, used heavily by tests.
    pub fn with_children(mut self, children: Vec<HostNode<R>>) -> Self {
        self.children = children;
        self
    }
}

/// One semantic unit of sung text as currently rendered.
///
/// `text` is non-empty after trimming; the extractor discards blocks with
/// no reconstructable text before they reach the aligner.
#[derive(Clone, Debug)]
pub struct VocalBlock<R> {
    /// The live block element this text was reconstructed from.
    pub handle: R,
    /// Reconstructed, whitespace-collapsed line text.
    pub text: String,
    /// Voice role derived from class metadata.
    pub role: VoiceRole,
    /// True for the last block in its visual group.
    pub is_last: bool,
}
