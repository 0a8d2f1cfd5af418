//! Magnet URI synthesis and parsing

use super::InfoHash;
use crate::tracker::DEFAULT_TRACKERS;

/// An info hash and tracker hints recovered from a magnet URI.
///
/// Parsing is total: malformed input parses to the empty value rather than
/// failing the caller. Treat `info_hash == None` as "not derivable".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Magnet {
    /// Hash from the `xt=urn:btih:` parameter, when recoverable.
    pub info_hash: Option<InfoHash>,
    /// `tr` parameters in order of appearance.
    pub trackers: Vec<String>,
}

impl Magnet {
    /// Parses a magnet URI, best-effort.
    ///
    /// Requires the `magnet` scheme and an `xt=urn:btih:` parameter carrying
    /// 40 hex characters; on any grammar violation the empty value is
    /// returned instead. Unknown query parameters are ignored.
    pub fn parse(uri: &str) -> Self {
        let Ok(url) = url::Url::parse(uri) else {
            return Self::default();
        };
        if url.scheme() != "magnet" {
            return Self::default();
        }

        let mut info_hash = None;
        let mut trackers = Vec::new();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "xt" if info_hash.is_none() => {
                    info_hash = value
                        .strip_prefix("urn:btih:")
                        .and_then(InfoHash::from_hex);
                }
                "tr" => trackers.push(value.into_owned()),
                _ => {}
            }
        }

        match info_hash {
            Some(info_hash) => Self {
                info_hash: Some(info_hash),
                trackers,
            },
            None => Self::default(),
        }
    }
}

/// Recovers an info hash from a stored magnet link, if it has one.
pub fn info_hash_in(uri: &str) -> Option<InfoHash> {
    Magnet::parse(uri).info_hash
}

/// Builds a magnet URI for the given hash.
///
/// Appends one `tr` parameter per tracker, de-duplicated preserving first
/// occurrence. When `trackers` is empty the compiled-in default list is
/// used instead. Tracker URLs are fully percent-encoded.
pub fn magnet_uri(info_hash: &InfoHash, trackers: &[String]) -> String {
    let mut unique: Vec<&str> = Vec::new();
    for tracker in trackers {
        if !unique.contains(&tracker.as_str()) {
            unique.push(tracker.as_str());
        }
    }
    if unique.is_empty() {
        unique.extend(DEFAULT_TRACKERS);
    }

    let mut uri = format!("magnet:?xt=urn:btih:{info_hash}");
    for tracker in unique {
        uri.push_str("&tr=");
        uri.push_str(&urlencoding::encode(tracker));
    }
    uri
}
