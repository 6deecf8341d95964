use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries across all shards (default: 10,000)
    pub cache_max_entries: usize,
    /// Number of independently locked cache shards (default: 16)
    pub cache_shards: usize,
    /// Interval between expired-entry sweeps in seconds (default: 60, 0 disables)
    pub cache_sweep_interval_seconds: u64,
    /// Path to SQLite database file (default: "pauz.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_SHARDS` - Number of cache shards (default: 16)
    /// - `CACHE_SWEEP_INTERVAL_SECONDS` - Sweep interval, 0 disables (default: 60)
    /// - `SQLITE_PATH` - SQLite database path (default: "pauz.db")
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env_or("CACHE_TTL_SECONDS", 300),
            cache_max_entries: env_or::<usize>("CACHE_MAX_ENTRIES", 10_000).max(1),
            cache_shards: env_or("CACHE_SHARDS", 16),
            cache_sweep_interval_seconds: env_or("CACHE_SWEEP_INTERVAL_SECONDS", 60),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "pauz.db".to_string()),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the sweep interval, or `None` when sweeping is disabled.
    pub fn cache_sweep_interval(&self) -> Option<Duration> {
        (self.cache_sweep_interval_seconds > 0)
            .then(|| Duration::from_secs(self.cache_sweep_interval_seconds))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 300,
            cache_max_entries: 10_000,
            cache_shards: 16,
            cache_sweep_interval_seconds: 60,
            sqlite_path: "pauz.db".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_ttl_conversion() {
        let config = Config {
            cache_ttl_seconds: 600,
            ..Config::default()
        };

        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_sweep_interval_zero_disables() {
        let config = Config {
            cache_sweep_interval_seconds: 0,
            ..Config::default()
        };
        assert_eq!(config.cache_sweep_interval(), None);
        assert_eq!(
            Config::default().cache_sweep_interval(),
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_shards, 16);
        assert_eq!(config.sqlite_path, "pauz.db");
    }

    #[test]
    fn test_from_env_defaults_when_unset_or_invalid() {
        env::remove_var("CACHE_MAX_ENTRIES");
        env::set_var("CACHE_SHARDS", "not-a-number");

        let config = Config::from_env();

        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_shards, 16);
        env::remove_var("CACHE_SHARDS");
    }
}
