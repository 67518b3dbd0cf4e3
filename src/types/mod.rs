//! Common types and constants shared by the tree and its tooling.

use crate::error::{BTreeError, Result};
use serde::{Deserialize, Serialize};

/// Smallest minimum degree for which split and merge are well defined
pub const MIN_DEGREE: usize = 2;

/// Largest minimum degree whose `2t` children still fit in a `usize`
pub const MAX_DEGREE: usize = usize::MAX / 2;

/// Default minimum degree (small enough that dumps stay readable)
pub const DEFAULT_MIN_DEGREE: usize = 3;

/// Maximum number of keys a node of minimum degree `t` may hold
pub const fn max_keys(min_degree: usize) -> usize {
    2 * min_degree - 1
}

/// Minimum number of keys any non-root node of minimum degree `t` must hold
pub const fn min_keys(min_degree: usize) -> usize {
    min_degree - 1
}

/// BTree configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BTreeConfig {
    /// Minimum degree `t`; every non-root node keeps between `t - 1` and `2t - 1` keys
    pub min_degree: usize,
}

impl Default for BTreeConfig {
    fn default() -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
        }
    }
}

impl BTreeConfig {
    /// Create a new config with the given minimum degree
    pub fn new(min_degree: usize) -> Self {
        Self { min_degree }
    }

    /// Set the minimum degree
    pub fn min_degree(mut self, min_degree: usize) -> Self {
        self.min_degree = min_degree;
        self
    }

    /// Parse a config from JSON, e.g. `{"minDegree": 4}`
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the minimum degree is usable
    pub fn validate(&self) -> Result<()> {
        let fits = self.min_degree.checked_mul(2).is_some();
        if self.min_degree < MIN_DEGREE || !fits {
            return Err(BTreeError::InvalidDegree {
                degree: self.min_degree,
                min: MIN_DEGREE,
                max: MAX_DEGREE,
            });
        }
        Ok(())
    }

    /// Maximum keys per node under this config
    pub fn max_keys(&self) -> usize {
        max_keys(self.min_degree)
    }

    /// Minimum keys per non-root node under this config
    pub fn min_keys(&self) -> usize {
        min_keys(self.min_degree)
    }
}
