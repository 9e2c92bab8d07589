//! Aggregation configuration.
//!
//! Loaded from TOML text or built in code:
//!
//! ```rust
//! use pricer_ccr::config::{AggregationConfig, InvalidPathPolicy};
//!
//! let config = AggregationConfig::from_toml_str(
//!     r#"
//!     day_count = "act/360"
//!     invalid_path_policy = "exclude"
//!     pfe_quantile = 0.99
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.invalid_path_policy, InvalidPathPolicy::Exclude);
//! assert_eq!(config.parallel_threshold, 100);
//! ```

use crate::time::DayCount;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default minimum ensemble size for parallel path evaluation.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 100;

/// Default quantile reported as potential future exposure.
pub const DEFAULT_PFE_QUANTILE: f64 = 0.95;

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// PFE quantile outside (0, 1).
    #[error("Invalid PFE quantile: {0}. Must be in range (0, 1)")]
    InvalidQuantile(f64),

    /// Unknown invalid-path policy name.
    #[error("Invalid path policy: {0}. Must be one of: reject, exclude")]
    InvalidPolicy(String),

    /// TOML text could not be parsed.
    #[error("Configuration parse error: {0}")]
    Parse(String),
}

/// What the aggregator does with a scenario path that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidPathPolicy {
    /// Fail the whole aggregation on the first invalid path.
    #[default]
    Reject,
    /// Drop invalid paths, log them and record their indices.
    Exclude,
}

impl InvalidPathPolicy {
    /// Lowercase name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidPathPolicy::Reject => "reject",
            InvalidPathPolicy::Exclude => "exclude",
        }
    }
}

impl FromStr for InvalidPathPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(InvalidPathPolicy::Reject),
            "exclude" => Ok(InvalidPathPolicy::Exclude),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for InvalidPathPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings for [`crate::counterparty::CounterpartyGroupAggregator`].
///
/// Every scenario path must use `day_count` for its numeraire; a path that
/// does not is treated like one on the wrong grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Day count of the ensemble's numeraire paths.
    pub day_count: DayCount,
    /// Handling of invalid scenario paths.
    pub invalid_path_policy: InvalidPathPolicy,
    /// Minimum number of paths before the per-path map runs on rayon.
    pub parallel_threshold: usize,
    /// Upper quantile reported by the digest.
    pub pfe_quantile: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            day_count: DayCount::default(),
            invalid_path_policy: InvalidPathPolicy::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            pfe_quantile: DEFAULT_PFE_QUANTILE,
        }
    }
}

impl AggregationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the day count.
    pub fn with_day_count(mut self, day_count: DayCount) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the invalid-path policy.
    pub fn with_invalid_path_policy(mut self, policy: InvalidPathPolicy) -> Self {
        self.invalid_path_policy = policy;
        self
    }

    /// Sets the parallel threshold.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the PFE quantile.
    pub fn with_pfe_quantile(mut self, quantile: f64) -> Self {
        self.pfe_quantile = quantile;
        self
    }

    /// Returns whether `n_paths` paths should be evaluated in parallel.
    #[inline]
    pub fn should_parallelize(&self, n_paths: usize) -> bool {
        n_paths >= self.parallel_threshold
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidQuantile`] unless `0 < pfe_quantile < 1`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pfe_quantile > 0.0 && self.pfe_quantile < 1.0) {
            return Err(ConfigError::InvalidQuantile(self.pfe_quantile));
        }
        Ok(())
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
