//! Process-wide tracker list management
//!
//! Magnet synthesis and announce fallbacks want a current list of public
//! trackers. This module seeds one from a compiled-in list, lets callers
//! merge additions, and refreshes it from a remote plain-text feed.

pub mod defaults;
pub mod feed;
pub mod registry;

pub use defaults::DEFAULT_TRACKERS;
pub use feed::{HttpTrackerFeed, TrackerFeed};
pub use registry::TrackerRegistry;
use thiserror::Error;

/// Errors from tracker feed operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Feed request failed before a response arrived.
    #[error("Tracker feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed responded with a non-success status code.
    #[error("Tracker feed returned status {code}")]
    Status { code: u16 },
}
