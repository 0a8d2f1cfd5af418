//! Driftnet Core - Torrent metadata extraction and bounded fan-out collection
//!
//! This crate provides the building blocks for turning BitTorrent metadata
//! into query-ready records: a bencode codec with order-preserving
//! dictionaries, info-hash derivation, a metadata extraction pipeline, magnet
//! URI handling, a bounded concurrent collector for unreliable sources, and a
//! process-wide tracker registry.

pub mod bencode;
pub mod collect;
pub mod config;
pub mod torrent;
pub mod tracker;

// Re-export main types for convenient access
pub use bencode::BencodeError;
pub use collect::{CollectError, CollectStream, CollectedResult, FanOutCollector};
pub use config::{CollectConfig, DriftnetConfig, TrackerConfig};
pub use torrent::{
    ExtractError, FileEntry, InfoHash, Magnet, MetadataExtractor, SourceError, TorrentMetadata,
    TorrentSource,
};
pub use tracker::{TrackerError, TrackerRegistry};

/// Errors that can bubble up from any Driftnet subsystem.
///
/// Callers working a single subsystem should prefer that subsystem's own
/// error type; this umbrella exists for code paths that aggregate several.
#[derive(Debug, thiserror::Error)]
pub enum DriftnetError {
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Bencode error: {0}")]
    Bencode(#[from] BencodeError),

    #[error("Collection error: {0}")]
    Collect(#[from] CollectError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub type Result<T> = std::result::Result<T, DriftnetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_errors_convert_into_the_umbrella() {
        let error: DriftnetError = ExtractError::NoVideoFiles.into();
        assert!(matches!(error, DriftnetError::Extract(_)));

        let error: DriftnetError = TrackerError::Status { code: 503 }.into();
        assert!(matches!(error, DriftnetError::Tracker(_)));

        let error: DriftnetError = SourceError::new("unreachable").into();
        assert_eq!(error.to_string(), "Source error: Source fetch failed: unreachable");
    }
}
