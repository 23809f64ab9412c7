//! Track identity
//!
//! Derived from the host player state on each reconciliation pass. A
//! change of identity invalidates the in-memory alignment map and triggers
//! a fresh whole-track fetch attempt.

use serde::{Deserialize, Serialize};

/// Identity of the currently playing track.
///
/// Two identities are the same track iff all three fields match. Empty
/// strings mean "unknown", not "matches anything": an unknown artist on
/// one side and a known artist on the other is a difference.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TrackIdentity {
    pub artist: String,
    pub title: String,
    pub uri: String,
}

impl TrackIdentity {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            uri: uri.into(),
        }
    }

    /// Whether the identity carries enough information to key a
    /// whole-track lyrics fetch.
    pub fn is_fetchable(&self) -> bool {
        !self.artist.is_empty() && !self.title.is_empty()
    }
}
