//! Shared error types for the services crate.

use thiserror::Error;

/// Errors reported by an embedded playback widget.
///
/// Never fatal to the session: the card stays awaiting playback and the
/// user may retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("media engine is not available")]
    Unavailable,

    #[error("widget rejected the request: {0}")]
    Rejected(String),
}
