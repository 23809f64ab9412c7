//! Cache subsystem
//!
//! Three independently-keyed stores with distinct lifetimes, all layered
//! over one string key-value abstraction:
//!
//! - `line`: per-line translations, keyed by normalized text + language
//! - `track`: whole-song lyrics/translation pairs, keyed by artist + title
//!   + language
//! - `endpoint`: the discovered backend location, with manual-override
//!   precedence
//!
//! Storage failure is never fatal anywhere in this module: reads degrade
//! to cache misses, writes are silently dropped, both logged at warn level.

pub mod endpoint;
pub mod line;
pub mod store;
pub mod track;

pub use endpoint::{EndpointCache, EndpointSource, ResolvedEndpoint};
pub use line::LineCache;
pub use store::{KeyValueStore, MemoryStore};
pub use track::{TrackCache, TrackLyrics};
