//! Engine configuration.
//!
//! Values come from `TIERBID_*` environment variables (a `.env` file is
//! honored by the binary through `dotenvy`), falling back to defaults.
//!
//! | Variable                      | Default    |
//! |-------------------------------|------------|
//! | `TIERBID_DEFAULT_TIER`        | `standard` |
//! | `TIERBID_WRITE_CONCURRENCY`   | `1`        |
//! | `TIERBID_WRITE_TIMEOUT_SECS`  | `30`       |
//! | `TIERBID_MAX_VERSIONS`        | `20`       |

use std::time::Duration;

use crate::error::ConfigError;
use crate::model::MaterialTier;

/// Configuration for the estimate editor.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Tier a new editing session starts at.
    pub default_tier: MaterialTier,
    /// Line-item writes in flight at once during a batch. 1 writes sequentially.
    pub write_concurrency: usize,
    /// Deadline for each individual store call made during a batch.
    pub write_timeout: Duration,
    /// Versions kept in the in-memory history.
    pub max_versions: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_tier: MaterialTier::Standard,
            write_concurrency: 1,
            write_timeout: Duration::from_secs(30),
            max_versions: 20,
        }
    }
}

impl PricingConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("TIERBID_DEFAULT_TIER") {
            config.default_tier = v.parse().map_err(|message| ConfigError::InvalidValue {
                key: "TIERBID_DEFAULT_TIER".to_string(),
                message,
            })?;
        }

        if let Some(v) = lookup("TIERBID_WRITE_CONCURRENCY") {
            let n = parse_number("TIERBID_WRITE_CONCURRENCY", &v)?;
            if n == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "TIERBID_WRITE_CONCURRENCY".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
            config.write_concurrency = n as usize;
        }

        if let Some(v) = lookup("TIERBID_WRITE_TIMEOUT_SECS") {
            let secs = parse_number("TIERBID_WRITE_TIMEOUT_SECS", &v)?;
            config.write_timeout = Duration::from_secs(secs);
        }

        if let Some(v) = lookup("TIERBID_MAX_VERSIONS") {
            config.max_versions = parse_number("TIERBID_MAX_VERSIONS", &v)? as usize;
        }

        Ok(config)
    }

    /// Set the tier new sessions start at.
    pub fn with_default_tier(mut self, tier: MaterialTier) -> Self {
        self.default_tier = tier;
        self
    }

    /// Allow up to `n` concurrent writes per batch (minimum 1).
    pub fn with_write_concurrency(mut self, n: usize) -> Self {
        self.write_concurrency = n.max(1);
        self
    }

    /// Set the per-write deadline used during batches.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set how many versions the in-memory history keeps.
    pub fn with_max_versions(mut self, max: usize) -> Self {
        self.max_versions = max;
        self
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = PricingConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.default_tier, MaterialTier::Standard);
        assert_eq!(config.write_concurrency, 1);
        assert_eq!(config.write_timeout, Duration::from_secs(30));
        assert_eq!(config.max_versions, 20);
    }

    #[test]
    fn test_reads_overrides() {
        let config = PricingConfig::from_lookup(lookup(&[
            ("TIERBID_DEFAULT_TIER", "premium"),
            ("TIERBID_WRITE_CONCURRENCY", "8"),
            ("TIERBID_WRITE_TIMEOUT_SECS", "5"),
            ("TIERBID_MAX_VERSIONS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.default_tier, MaterialTier::Premium);
        assert_eq!(config.write_concurrency, 8);
        assert_eq!(config.write_timeout, Duration::from_secs(5));
        assert_eq!(config.max_versions, 3);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PricingConfig::from_lookup(lookup(&[("TIERBID_DEFAULT_TIER", "gold")])).is_err());
        assert!(PricingConfig::from_lookup(lookup(&[("TIERBID_WRITE_CONCURRENCY", "0")])).is_err());
        let bad_timeout = lookup(&[("TIERBID_WRITE_TIMEOUT_SECS", "soon")]);
        assert!(PricingConfig::from_lookup(bad_timeout).is_err());
    }

    #[test]
    fn test_builder_clamps_concurrency() {
        let config = PricingConfig::default().with_write_concurrency(0);
        assert_eq!(config.write_concurrency, 1);
    }
}
