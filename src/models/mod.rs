//! Core data model
//!
//! Plain data types shared across the extraction, alignment, and
//! reconciliation layers.
//!
//! ## Modules
//!
//! - `block`: vocal blocks and the host-tree snapshot they are extracted from
//! - `track`: track identity as reported by the host player

pub mod block;
pub mod track;

// Re-exports for convenience
pub use block::{HostNode, VocalBlock, VoiceRole};
pub use track::TrackIdentity;
