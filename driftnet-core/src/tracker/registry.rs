//! Shared tracker list with copy-and-swap updates

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::defaults::DEFAULT_TRACKERS;
use super::feed::TrackerFeed;
use super::TrackerError;

struct Shared {
    list: Arc<Vec<String>>,
    version: u64,
}

/// Process-lifetime tracker list.
///
/// Readers take cheap [`Arc`] snapshots; updates build a new list and swap
/// it in under a short write lock. A snapshot therefore always observes
/// either the old list or the fully-merged one, never a partial update.
pub struct TrackerRegistry {
    shared: RwLock<Shared>,
}

impl TrackerRegistry {
    /// Creates a registry seeded with the compiled-in default trackers.
    pub fn new() -> Self {
        Self::with_trackers(DEFAULT_TRACKERS.iter().map(|t| (*t).to_string()))
    }

    /// Creates a registry from an explicit seed list.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn with_trackers<I>(seed: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut list = Vec::new();
        for tracker in seed {
            if !list.contains(&tracker) {
                list.push(tracker);
            }
        }
        Self {
            shared: RwLock::new(Shared {
                list: Arc::new(list),
                version: 0,
            }),
        }
    }

    /// Returns the current list. Snapshots are immutable and unaffected by
    /// later merges.
    pub fn snapshot(&self) -> Arc<Vec<String>> {
        self.shared.read().list.clone()
    }

    /// Number of list replacements since construction.
    pub fn version(&self) -> u64 {
        self.shared.read().version
    }

    /// Number of known trackers.
    pub fn len(&self) -> usize {
        self.shared.read().list.len()
    }

    /// Returns true if the registry holds no trackers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merges tracker URLs into the list, skipping ones already present.
    ///
    /// Returns the number of trackers added. The list is replaced wholesale
    /// and the version bumped only when something was actually new.
    pub fn merge<I>(&self, additions: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut guard = self.shared.write();
        let mut merged = guard.list.as_ref().clone();
        for tracker in additions {
            if !merged.contains(&tracker) {
                merged.push(tracker);
            }
        }

        let added = merged.len() - guard.list.len();
        if added > 0 {
            guard.list = Arc::new(merged);
            guard.version += 1;
        }
        added
    }

    /// Fetches the feed once and merges the result.
    ///
    /// Returns the number of trackers added. On failure the list and
    /// version are left unchanged.
    ///
    /// # Errors
    ///
    /// - `TrackerError::Http` - Feed request failed at the transport level
    /// - `TrackerError::Status` - Feed responded with a non-success status
    pub async fn refresh(&self, feed: &dyn TrackerFeed) -> Result<usize, TrackerError> {
        let fetched = feed.fetch().await?;
        let loaded = fetched.len();
        let added = self.merge(fetched);
        tracing::info!(
            "Loaded {} trackers ({} new). Total: {}",
            loaded,
            added,
            self.len()
        );
        Ok(added)
    }

    /// Refreshes immediately, then on every interval tick, forever.
    ///
    /// Failures are logged; the current list stays in effect until the next
    /// successful refresh.
    pub async fn run_refresh(&self, feed: &dyn TrackerFeed, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(error) = self.refresh(feed).await {
                tracing::error!("Failed to load trackers: {}", error);
            }
        }
    }
}

impl Default for TrackerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
