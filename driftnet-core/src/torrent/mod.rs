//! Torrent metadata extraction and magnet link handling

pub mod extract;
pub mod magnet;
pub mod resolve;
pub mod types;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha1::{Digest, Sha1};

pub use extract::MetadataExtractor;
pub use magnet::{Magnet, info_hash_in, magnet_uri};
pub use resolve::{SourceError, TorrentSource, resolve_info_hashes};
pub use types::{ContentFilter, FileEntry, ParsedTitle, TitleParser, TorrentMetadata};

use crate::bencode::{self, BencodeError, Value};

/// SHA-1 hash identifying a unique torrent.
///
/// 20-byte SHA-1 digest of the canonically re-encoded `info` dictionary.
/// Displays and serializes as 40 lowercase hex characters, the form the
/// BitTorrent ecosystem exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; 20]);

impl InfoHash {
    /// Creates InfoHash from a 20-byte SHA-1 digest.
    pub fn new(hash: [u8; 20]) -> Self {
        Self(hash)
    }

    /// Derives the info hash of a decoded `info` value.
    ///
    /// Re-encodes the value with [`bencode::encode`] and hashes the result.
    /// Because dictionaries re-encode in source order, this matches the
    /// digest of the original `info` bytes.
    pub fn for_value(info: &Value) -> Self {
        let encoded = bencode::encode(info);
        let digest = Sha1::digest(&encoded);
        Self(digest.into())
    }

    /// Parses a 40-character hex string, accepting either case.
    pub fn from_hex(text: &str) -> Option<Self> {
        if text.len() != 40 {
            return None;
        }
        let decoded = hex::decode(text).ok()?;
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&decoded);
        Some(Self(hash))
    }

    /// Returns reference to the underlying 20-byte digest.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for InfoHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InfoHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text)
            .ok_or_else(|| serde::de::Error::custom("info hash must be 40 hex characters"))
    }
}

/// Errors that can occur while extracting metadata from torrent bytes.
///
/// Extraction is all-or-nothing: any of these means no record was produced,
/// never a partial one. Callers pick between propagating
/// ([`MetadataExtractor::extract`]) and log-and-skip
/// ([`MetadataExtractor::extract_or_skip`]).
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Malformed bencode data: {0}")]
    MalformedBencode(#[from] BencodeError),

    #[error("Invalid torrent structure: {reason}")]
    InvalidTorrent { reason: String },

    #[error("Torrent name is empty")]
    EmptyName,

    #[error("Torrent name flagged by content filter: {name}")]
    AdultContent { name: String },

    #[error("No video files found in torrent")]
    NoVideoFiles,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::decode;

    #[test]
    fn test_info_hash_display() {
        let hash = [
            0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab,
            0xcd, 0xef, 0x01, 0x23, 0x45, 0x67,
        ];
        let info_hash = InfoHash::new(hash);
        assert_eq!(
            info_hash.to_string(),
            "0123456789abcdef0123456789abcdef01234567"
        );
    }

    #[test]
    fn test_info_hash_from_hex_round_trips() {
        let text = "0123456789abcdef0123456789abcdef01234567";
        let parsed = InfoHash::from_hex(text).unwrap();
        assert_eq!(parsed.to_string(), text);

        // Uppercase input normalizes to lowercase display.
        let upper = InfoHash::from_hex("0123456789ABCDEF0123456789ABCDEF01234567").unwrap();
        assert_eq!(upper, parsed);
    }

    #[test]
    fn test_info_hash_from_hex_rejects_bad_input() {
        assert!(InfoHash::from_hex("").is_none());
        assert!(InfoHash::from_hex("abc123").is_none());
        assert!(InfoHash::from_hex("zz23456789abcdef0123456789abcdef01234567").is_none());
        // 39 and 41 characters.
        assert!(InfoHash::from_hex("0123456789abcdef0123456789abcdef0123456").is_none());
        assert!(InfoHash::from_hex("0123456789abcdef0123456789abcdef012345678").is_none());
    }

    #[test]
    fn test_for_value_matches_reference_digest() {
        // SHA-1 of the literal bytes below, computed with the reference
        // implementation.
        let info = decode(b"d6:lengthi1000e4:name14:Movie.2020.mkve").unwrap();
        assert_eq!(
            InfoHash::for_value(&info).to_string(),
            "52844434f390d050a91bf752a1358f12c4e9729f"
        );
    }

    #[test]
    fn test_for_value_depends_on_source_key_order() {
        // Same fields, different source order: different identity.
        let sorted = decode(b"d6:lengthi1000e4:name14:Movie.2020.mkve").unwrap();
        let reversed = decode(b"d4:name14:Movie.2020.mkv6:lengthi1000ee").unwrap();

        assert_eq!(
            InfoHash::for_value(&reversed).to_string(),
            "f4a6b1f43dab8f9ea1af83714d309d51d255e1e8"
        );
        assert_ne!(InfoHash::for_value(&sorted), InfoHash::for_value(&reversed));
    }

    #[test]
    fn test_info_hash_serde_as_hex_string() {
        let hash = InfoHash::from_hex("52844434f390d050a91bf752a1358f12c4e9729f").unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, "\"52844434f390d050a91bf752a1358f12c4e9729f\"");

        let back: InfoHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
        assert!(serde_json::from_str::<InfoHash>("\"nope\"").is_err());
    }
}
