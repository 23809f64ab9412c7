//! Error taxonomy
//!
//! Failures here are expected operating conditions, not bugs: the host UI
//! may not be rendered yet, the backend may be down or mid-redeploy, and
//! storage may be unavailable. Callers degrade every variant to "no
//! translation shown" rather than aborting the loop.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    #[error("lyrics UI not ready")]
    NotReady,

    #[error("network request failed: {0}")]
    NetworkFailure(String),

    #[error("invalid data from remote: {0}")]
    InvalidRemoteData(String),

    #[error("storage unavailable: {0}")]
    StorageFailure(String),
}
