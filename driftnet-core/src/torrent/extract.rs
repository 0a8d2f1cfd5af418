//! Torrent metadata extraction pipeline
//!
//! Decodes raw torrent bytes, derives the info hash, and reduces the file
//! list to normalized records with season/episode hints. Extraction is
//! all-or-nothing; see [`ExtractError`] for the failure taxonomy.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::DateTime;

use super::types::{ContentFilter, FileEntry, ParsedTitle, TitleParser, TorrentMetadata};
use super::{ExtractError, InfoHash};
use crate::bencode::{self, Value};

/// Recognized video container extensions, compared case-insensitively.
const VIDEO_EXTENSIONS: [&str; 10] = [
    "3gp", "mp4", "m4v", "mkv", "webm", "mov", "avi", "wmv", "mpg", "flv",
];

type ExtractResult<T> = Result<T, ExtractError>;

/// Turns raw torrent bytes into normalized [`TorrentMetadata`] records.
///
/// Holds the two collaborators the pipeline consults: a [`TitleParser`] for
/// release-name hints and a [`ContentFilter`] for the adult-content gate.
pub struct MetadataExtractor {
    title_parser: Arc<dyn TitleParser>,
    content_filter: Arc<dyn ContentFilter>,
}

impl MetadataExtractor {
    /// Creates an extractor around the given collaborators.
    pub fn new(title_parser: Arc<dyn TitleParser>, content_filter: Arc<dyn ContentFilter>) -> Self {
        Self {
            title_parser,
            content_filter,
        }
    }

    /// Extracts a metadata record from raw torrent bytes.
    ///
    /// `hints` short-circuits the title parse: when the caller already has
    /// parsed data for this torrent the collaborator is not consulted for
    /// the torrent-level fields (per-file parses still happen).
    ///
    /// # Errors
    ///
    /// - `ExtractError::MalformedBencode` - Input does not decode
    /// - `ExtractError::InvalidTorrent` - Decodes but is structurally broken
    /// - `ExtractError::EmptyName` - Missing or empty `info.name`
    /// - `ExtractError::AdultContent` - Name rejected by the content filter
    /// - `ExtractError::NoVideoFiles` - Filtering removed every file
    pub fn extract(
        &self,
        content: &[u8],
        hints: Option<&ParsedTitle>,
    ) -> ExtractResult<TorrentMetadata> {
        let root = bencode::decode(content)?;

        let info = root
            .get(b"info")
            .ok_or_else(|| invalid("missing 'info' dictionary"))?;
        let info_hash = InfoHash::for_value(info);
        let info_dict = info
            .as_dict()
            .ok_or_else(|| invalid("'info' is not a dictionary"))?;

        // Multi-file torrents carry a `files` list; single-file torrents
        // describe the one file on `info` itself.
        let multi_file = info_dict.contains_key(b"files");
        let files: Vec<&Value> = if multi_file {
            match info_dict.get(b"files") {
                Some(Value::List(entries)) => entries.iter().collect(),
                _ => return Err(invalid("'files' is not a list")),
            }
        } else {
            vec![info]
        };

        let mut total_size: u64 = 0;
        for file in &files {
            total_size = total_size
                .checked_add(file_length(file)?)
                .ok_or_else(|| invalid("total size overflows"))?;
        }

        let announce_list = announce_tier_heads(&root)?;

        let torrent_name = match info_dict.get(b"name") {
            None => String::new(),
            Some(value) => decode_text(value, "name")?,
        };
        if torrent_name.is_empty() {
            return Err(ExtractError::EmptyName);
        }

        let title_parse = match hints {
            Some(given) => given.clone(),
            None => self.title_parser.parse(&torrent_name),
        };

        if self.content_filter.is_adult(&torrent_name) {
            return Err(ExtractError::AdultContent { name: torrent_name });
        }

        let created_at = root
            .get(b"creation date")
            .and_then(Value::as_integer)
            .filter(|&stamp| stamp != 0)
            .and_then(|stamp| DateTime::from_timestamp(stamp, 0));

        // Torrent-level numbers only back a file up when they are
        // unambiguous: exactly one candidate.
        let torrent_season = unambiguous(&title_parse.seasons);
        let torrent_episode = unambiguous(&title_parse.episodes);

        let mut file_data = Vec::new();
        let mut file_seasons = BTreeSet::new();
        let mut file_episodes = BTreeSet::new();
        for (index, file) in files.iter().enumerate() {
            let filename = if multi_file {
                last_path_segment(file)?
            } else {
                torrent_name.clone()
            };

            if !is_video_file(&filename) {
                continue;
            }
            if filename.to_lowercase().contains("sample") {
                tracing::warn!("Skipping sample file: {}", filename);
                continue;
            }

            let file_parse = self.title_parser.parse(&filename);
            file_seasons.extend(file_parse.seasons.iter().copied());
            file_episodes.extend(file_parse.episodes.iter().copied());

            file_data.push(FileEntry {
                size: file_length(file)?,
                index,
                season_number: file_parse.seasons.first().copied().or(torrent_season),
                episode_number: file_parse.episodes.first().copied().or(torrent_episode),
                filename,
            });
        }

        if file_data.is_empty() {
            return Err(ExtractError::NoVideoFiles);
        }

        // First entry wins ties: replace only on strictly greater size.
        let mut largest = &file_data[0];
        for entry in &file_data[1..] {
            if entry.size > largest.size {
                largest = entry;
            }
        }
        let largest_file = largest.clone();

        let seasons: BTreeSet<u32> = if title_parse.seasons.is_empty() {
            file_seasons
        } else {
            title_parse.seasons.iter().copied().collect()
        };
        let episodes: BTreeSet<u32> = if title_parse.episodes.is_empty() {
            file_episodes
        } else {
            title_parse.episodes.iter().copied().collect()
        };

        Ok(TorrentMetadata {
            info_hash,
            announce_list,
            total_size,
            torrent_name,
            created_at,
            title: (!title_parse.title.is_empty()).then(|| title_parse.title.clone()),
            year: title_parse.year,
            languages: title_parse.languages.clone(),
            seasons,
            episodes,
            file_data,
            largest_file,
        })
    }

    /// Log-and-skip variant of [`extract`](Self::extract).
    ///
    /// Emits one warning per rejected torrent and returns `None`, for batch
    /// callers that treat a failed input as "produced nothing".
    pub fn extract_or_skip(
        &self,
        content: &[u8],
        hints: Option<&ParsedTitle>,
    ) -> Option<TorrentMetadata> {
        match self.extract(content, hints) {
            Ok(metadata) => Some(metadata),
            Err(error) => {
                tracing::warn!("Skipping torrent: {}", error);
                None
            }
        }
    }
}

fn invalid(reason: impl Into<String>) -> ExtractError {
    ExtractError::InvalidTorrent {
        reason: reason.into(),
    }
}

fn decode_text(value: &Value, field: &str) -> ExtractResult<String> {
    let bytes = value
        .as_bytes()
        .ok_or_else(|| invalid(format!("'{field}' is not a byte string")))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| invalid(format!("'{field}' is not valid UTF-8")))
}

fn file_length(file: &Value) -> ExtractResult<u64> {
    let length = file
        .get(b"length")
        .and_then(Value::as_integer)
        .ok_or_else(|| invalid("file entry missing integer 'length'"))?;
    u64::try_from(length).map_err(|_| invalid("file entry has negative 'length'"))
}

/// Base filename of a multi-file entry: the last `path` segment.
fn last_path_segment(file: &Value) -> ExtractResult<String> {
    let path = file
        .get(b"path")
        .and_then(Value::as_list)
        .ok_or_else(|| invalid("file entry missing 'path' list"))?;

    let mut segments = Vec::with_capacity(path.len());
    for component in path {
        segments.push(decode_text(component, "path")?);
    }
    segments
        .pop()
        .ok_or_else(|| invalid("file entry has empty 'path'"))
}

/// First URL of each tier of the top-level `announce-list`; empty tiers are
/// skipped.
fn announce_tier_heads(root: &Value) -> ExtractResult<Vec<String>> {
    let tiers = match root.get(b"announce-list") {
        None => return Ok(Vec::new()),
        Some(Value::List(tiers)) => tiers,
        Some(_) => return Err(invalid("'announce-list' is not a list")),
    };

    let mut heads = Vec::new();
    for tier in tiers {
        let tier = tier
            .as_list()
            .ok_or_else(|| invalid("announce tier is not a list"))?;
        if let Some(first) = tier.first() {
            heads.push(decode_text(first, "announce-list")?);
        }
    }
    Ok(heads)
}

fn unambiguous(candidates: &[u32]) -> Option<u32> {
    match candidates {
        [only] => Some(*only),
        _ => None,
    }
}

fn is_video_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, extension)) => VIDEO_EXTENSIONS
            .iter()
            .any(|v| extension.eq_ignore_ascii_case(v)),
        None => false,
    }
}
