//! Batch resolution of info hashes into metadata records
//!
//! The canonical composition of the fan-out collector and the extractor:
//! fetch raw torrent bytes for many hashes from a caller-supplied source,
//! extract each payload in swallow mode, and keep whatever succeeded.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use super::{InfoHash, MetadataExtractor, TorrentMetadata};
use crate::collect::FanOutCollector;

/// Opaque fetch failure reported by a [`TorrentSource`].
#[derive(Debug, thiserror::Error)]
#[error("Source fetch failed: {reason}")]
pub struct SourceError {
    pub reason: String,
}

impl SourceError {
    /// Creates a source error from any displayable cause.
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self {
            reason: cause.to_string(),
        }
    }
}

/// Something that can turn an info hash into raw torrent bytes.
///
/// Implementations live with the callers (debrid clients, caches, peer
/// gateways); the core only needs this one capability.
#[async_trait]
pub trait TorrentSource: Send + Sync {
    /// Fetches the bencoded torrent for `info_hash`.
    ///
    /// # Errors
    ///
    /// - `SourceError` - The source could not produce the bytes
    async fn fetch(&self, info_hash: &InfoHash) -> Result<Bytes, SourceError>;
}

/// Resolves many info hashes concurrently, keeping successful extractions.
///
/// Each hash is fetched through `source` under the collector's limits, then
/// extracted in swallow mode. Fetch failures, timeouts, and extraction
/// rejections are logged and skipped; one bad hash never disturbs the rest.
/// Results are in completion order, not input order.
pub async fn resolve_info_hashes(
    source: Arc<dyn TorrentSource>,
    extractor: &MetadataExtractor,
    collector: &FanOutCollector,
    info_hashes: &[InfoHash],
) -> Vec<TorrentMetadata> {
    let operations = info_hashes.iter().map(|&info_hash| {
        let source = source.clone();
        async move { (info_hash, source.fetch(&info_hash).await) }
    });

    let mut results = collector.collect(operations);
    let mut resolved = Vec::new();
    while let Some(result) = results.next().await {
        let (info_hash, fetched) = match result {
            Ok(completed) => completed,
            Err(error) => {
                tracing::warn!("Dropping torrent fetch: {}", error);
                continue;
            }
        };
        let content = match fetched {
            Ok(content) => content,
            Err(error) => {
                tracing::warn!("Failed to fetch torrent {}: {}", info_hash, error);
                continue;
            }
        };
        if let Some(metadata) = extractor.extract_or_skip(&content, None) {
            resolved.push(metadata);
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::config::CollectConfig;
    use crate::torrent::types::{ContentFilter, ParsedTitle, TitleParser};

    struct EmptyParser;

    impl TitleParser for EmptyParser {
        fn parse(&self, _raw: &str) -> ParsedTitle {
            ParsedTitle::default()
        }
    }

    struct NoFilter;

    impl ContentFilter for NoFilter {
        fn is_adult(&self, _name: &str) -> bool {
            false
        }
    }

    /// Serves canned torrent bytes; unknown hashes fail, hashes in
    /// `hang_on` never complete.
    struct TableSource {
        torrents: HashMap<InfoHash, Bytes>,
        hang_on: Vec<InfoHash>,
    }

    #[async_trait]
    impl TorrentSource for TableSource {
        async fn fetch(&self, info_hash: &InfoHash) -> Result<Bytes, SourceError> {
            if self.hang_on.contains(info_hash) {
                sleep(Duration::from_secs(3600)).await;
            }
            self.torrents
                .get(info_hash)
                .cloned()
                .ok_or_else(|| SourceError::new("not in table"))
        }
    }

    fn extractor() -> MetadataExtractor {
        MetadataExtractor::new(Arc::new(EmptyParser), Arc::new(NoFilter))
    }

    fn collector() -> FanOutCollector {
        FanOutCollector::new(CollectConfig {
            max_concurrent: 4,
            op_timeout: Duration::from_millis(200),
        })
    }

    const MOVIE_TORRENT: &[u8] = b"d4:infod6:lengthi1000e4:name14:Movie.2020.mkvee";
    const MOVIE_HASH: &str = "52844434f390d050a91bf752a1358f12c4e9729f";

    fn hash(text: &str) -> InfoHash {
        InfoHash::from_hex(text).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_known_hashes() {
        let source = TableSource {
            torrents: HashMap::from([(hash(MOVIE_HASH), Bytes::from_static(MOVIE_TORRENT))]),
            hang_on: Vec::new(),
        };

        let resolved = resolve_info_hashes(
            Arc::new(source),
            &extractor(),
            &collector(),
            &[hash(MOVIE_HASH)],
        )
        .await;

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].info_hash, hash(MOVIE_HASH));
        assert_eq!(resolved[0].torrent_name, "Movie.2020.mkv");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_skipped_not_raised() {
        let unknown = hash("00000000000000000000000000000000000000aa");
        let hung = hash("00000000000000000000000000000000000000bb");
        let source = TableSource {
            torrents: HashMap::from([(hash(MOVIE_HASH), Bytes::from_static(MOVIE_TORRENT))]),
            hang_on: vec![hung],
        };

        let resolved = resolve_info_hashes(
            Arc::new(source),
            &extractor(),
            &collector(),
            &[unknown, hung, hash(MOVIE_HASH)],
        )
        .await;

        // The unknown hash fails its fetch, the hung one times out; only
        // the good one survives.
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].info_hash, hash(MOVIE_HASH));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unextractable_payload_is_skipped() {
        let bad = hash("00000000000000000000000000000000000000cc");
        let source = TableSource {
            torrents: HashMap::from([(bad, Bytes::from_static(b"not bencode at all"))]),
            hang_on: Vec::new(),
        };

        let resolved =
            resolve_info_hashes(Arc::new(source), &extractor(), &collector(), &[bad]).await;

        assert!(resolved.is_empty());
    }
}
