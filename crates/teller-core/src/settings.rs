//! Configuration loaded from config files and environment

use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;

use teller_lock::LockConfig;

/// Application configuration
///
/// Values come from `conf/teller.yml` (optional) layered under
/// `TELLER_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TellerConfig {
    /// Budget for one lock acquisition attempt, in milliseconds
    pub lock_acquire_timeout_ms: u64,
    /// Interval between set-if-absent polls, in milliseconds
    pub lock_poll_interval_ms: u64,
    /// TTL stamped on lock entries, in milliseconds; must stay well
    /// above the expected critical-section latency
    pub lock_entry_ttl_ms: u64,
    /// Open-account cap per user
    pub max_accounts_per_user: usize,
}

impl Default for TellerConfig {
    fn default() -> Self {
        Self {
            lock_acquire_timeout_ms: 5000,
            lock_poll_interval_ms: 100,
            lock_entry_ttl_ms: 15000,
            max_accounts_per_user: teller_common::MAX_ACCOUNTS_PER_USER,
        }
    }
}

impl TellerConfig {
    /// Load configuration from the environment and the optional config file
    pub fn load() -> anyhow::Result<Self> {
        let config = Config::builder()
            .add_source(config::File::with_name("conf/teller").required(false))
            .add_source(Environment::with_prefix("teller").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Lock timing parameters derived from this configuration
    pub fn lock_config(&self) -> LockConfig {
        LockConfig {
            acquire_timeout: Duration::from_millis(self.lock_acquire_timeout_ms),
            poll_interval: Duration::from_millis(self.lock_poll_interval_ms),
            entry_ttl: Duration::from_millis(self.lock_entry_ttl_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TellerConfig::default();
        assert_eq!(config.lock_acquire_timeout_ms, 5000);
        assert_eq!(config.lock_poll_interval_ms, 100);
        assert_eq!(config.max_accounts_per_user, 10);

        let lock = config.lock_config();
        assert_eq!(lock.poll_interval, Duration::from_millis(100));
        // TTL strictly exceeds the acquire budget
        assert!(lock.entry_ttl > lock.acquire_timeout);
    }
}
