//! Centralized configuration for Driftnet.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Central configuration for all Driftnet components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct DriftnetConfig {
    pub collect: CollectConfig,
    pub trackers: TrackerConfig,
}

/// Fan-out collection configuration.
///
/// Controls how many fetch operations run at once and how long each
/// individual operation may take before it is written off.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Maximum operations running concurrently
    pub max_concurrent: usize,
    /// Per-operation deadline
    pub op_timeout: Duration,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            op_timeout: Duration::from_secs(30),
        }
    }
}

/// Tracker list and feed configuration.
///
/// Controls where extra tracker URLs are fetched from and how the HTTP
/// client for the feed behaves.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Plain-text feed of tracker URLs, one per line
    pub feed_url: String,
    /// HTTP request timeout for feed fetches
    pub http_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
    /// Optional proxy for feed fetches (None = direct)
    pub proxy_url: Option<String>,
    /// Delay between background refreshes
    pub refresh_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            feed_url:
                "https://raw.githubusercontent.com/ngosang/trackerslist/master/trackers_best.txt"
                    .to_string(),
            http_timeout: Duration::from_secs(30),
            user_agent: "driftnet/0.1.0",
            proxy_url: None, // Direct connection by default
            refresh_interval: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl DriftnetConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Collection configuration overrides
        if let Ok(limit) = std::env::var("DRIFTNET_MAX_CONCURRENT") {
            if let Ok(count) = limit.parse::<usize>() {
                config.collect.max_concurrent = count;
            }
        }

        if let Ok(timeout) = std::env::var("DRIFTNET_OP_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.collect.op_timeout = Duration::from_secs(seconds);
            }
        }

        // Tracker configuration overrides
        if let Ok(url) = std::env::var("DRIFTNET_TRACKER_FEED_URL") {
            config.trackers.feed_url = url;
        }

        if let Ok(proxy) = std::env::var("DRIFTNET_PROXY_URL") {
            config.trackers.proxy_url = Some(proxy);
        }

        if let Ok(interval) = std::env::var("DRIFTNET_TRACKER_REFRESH_INTERVAL") {
            if let Ok(seconds) = interval.parse::<u64>() {
                config.trackers.refresh_interval = Duration::from_secs(seconds);
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    pub fn for_testing() -> Self {
        Self {
            collect: CollectConfig {
                max_concurrent: 4,
                op_timeout: Duration::from_millis(200),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = DriftnetConfig::default();

        assert_eq!(config.collect.max_concurrent, 10);
        assert_eq!(config.collect.op_timeout, Duration::from_secs(30));
        assert!(config.trackers.feed_url.contains("trackers_best.txt"));
        assert_eq!(config.trackers.http_timeout, Duration::from_secs(30));
        assert_eq!(config.trackers.user_agent, "driftnet/0.1.0");
        assert_eq!(config.trackers.proxy_url, None);
    }

    #[test]
    fn test_testing_preset_shrinks_collection_limits() {
        let config = DriftnetConfig::for_testing();

        assert!(config.collect.max_concurrent < 10);
        assert!(config.collect.op_timeout < Duration::from_secs(1));
        // Tracker settings stay at their defaults.
        assert_eq!(config.trackers.user_agent, "driftnet/0.1.0");
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("DRIFTNET_MAX_CONCURRENT", "25");
            std::env::set_var("DRIFTNET_OP_TIMEOUT", "5");
            std::env::set_var("DRIFTNET_TRACKER_FEED_URL", "http://feed.test/list.txt");
            std::env::set_var("DRIFTNET_PROXY_URL", "http://proxy.test:8080");
            std::env::set_var("DRIFTNET_TRACKER_REFRESH_INTERVAL", "60");
        }

        let config = DriftnetConfig::from_env();

        assert_eq!(config.collect.max_concurrent, 25);
        assert_eq!(config.collect.op_timeout, Duration::from_secs(5));
        assert_eq!(config.trackers.feed_url, "http://feed.test/list.txt");
        assert_eq!(
            config.trackers.proxy_url.as_deref(),
            Some("http://proxy.test:8080")
        );
        assert_eq!(config.trackers.refresh_interval, Duration::from_secs(60));

        // Unparseable values keep the default.
        unsafe {
            std::env::set_var("DRIFTNET_OP_TIMEOUT", "not-a-number");
        }
        let config = DriftnetConfig::from_env();
        assert_eq!(config.collect.op_timeout, Duration::from_secs(30));

        // Cleanup
        unsafe {
            std::env::remove_var("DRIFTNET_MAX_CONCURRENT");
            std::env::remove_var("DRIFTNET_OP_TIMEOUT");
            std::env::remove_var("DRIFTNET_TRACKER_FEED_URL");
            std::env::remove_var("DRIFTNET_PROXY_URL");
            std::env::remove_var("DRIFTNET_TRACKER_REFRESH_INTERVAL");
        }
    }
}
