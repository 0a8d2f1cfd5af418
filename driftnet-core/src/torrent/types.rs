//! Records and collaborator interfaces for metadata extraction

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::InfoHash;

/// Normalized record extracted from one torrent.
///
/// Immutable once returned: extraction either produces a complete record or
/// fails, never a partial one. `total_size` counts every declared file,
/// including the ones video filtering later dropped from `file_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentMetadata {
    pub info_hash: InfoHash,
    /// First URL of each announce tier, in tier order.
    pub announce_list: Vec<String>,
    /// Sum of all declared file lengths in bytes, before filtering.
    pub total_size: u64,
    pub torrent_name: String,
    /// Declared creation time, when present and non-zero.
    pub created_at: Option<DateTime<Utc>>,
    /// Cleaned display title from the title parse, when one was found.
    pub title: Option<String>,
    pub year: Option<u16>,
    pub languages: Vec<String>,
    /// Torrent-level season candidates; backfilled from per-file hints when
    /// the torrent-level parse found none.
    pub seasons: BTreeSet<u32>,
    pub episodes: BTreeSet<u32>,
    /// Surviving video files, in original list order. Never empty.
    pub file_data: Vec<FileEntry>,
    /// Largest entry of `file_data` by size; earlier index wins ties.
    pub largest_file: FileEntry,
}

/// One video file within a torrent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Base name only, without directories.
    pub filename: String,
    pub size: u64,
    /// Position within the original file list, counting filtered entries.
    pub index: usize,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
}

/// Structured guess produced by a [`TitleParser`].
///
/// Best-effort and non-authoritative; empty fields mean the parser saw
/// nothing it recognized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedTitle {
    pub title: String,
    pub seasons: Vec<u32>,
    pub episodes: Vec<u32>,
    pub languages: Vec<String>,
    pub year: Option<u16>,
}

/// Release-name parsing collaborator.
///
/// Given free text like `Show.S02E05.1080p.WEB.x264-GRP`, returns whatever
/// structure it can recognize. Implementations never fail; an unrecognized
/// input yields an empty [`ParsedTitle`].
pub trait TitleParser: Send + Sync {
    /// Parses a raw release name into structured hints.
    fn parse(&self, raw: &str) -> ParsedTitle;
}

/// Content-policy predicate over torrent names.
pub trait ContentFilter: Send + Sync {
    /// Returns true when the name should be refused as adult content.
    fn is_adult(&self, name: &str) -> bool;
}
