// Copyright (c) 2025 Hale Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration options for the Hale chain map.

use serde::{Deserialize, Serialize};

use super::error::{HaleChainMapError, Result};
use super::value::ValueKind;

/// Configuration for the Hale chain map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaleChainMapConfig {
    /// Number of buckets allocated up front. Must be at least 1.
    pub initial_bucket_count: usize,

    /// Maximum load factor (`size / bucket_count`) an insertion may produce
    /// before the table grows.
    pub max_load_factor: f64,

    /// Target load factor used when sizing the table for `reserve`.
    /// Kept below the maximum so reserved tables have headroom.
    pub reserve_load_factor: f64,

    /// Kind every key must carry.
    pub key_kind: ValueKind,

    /// Kind every value must carry.
    pub value_kind: ValueKind,
}

impl HaleChainMapConfig {
    /// Creates a new configuration with default values.
    ///
    /// # Returns
    ///
    /// A new `HaleChainMapConfig` instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial number of buckets.
    ///
    /// # Arguments
    ///
    /// * `initial_bucket_count` - The number of buckets to start with.
    ///
    /// # Returns
    ///
    /// Self with the updated configuration.
    pub fn with_initial_bucket_count(mut self, initial_bucket_count: usize) -> Self {
        self.initial_bucket_count = initial_bucket_count;
        self
    }

    /// Sets the maximum load factor before triggering growth.
    ///
    /// # Arguments
    ///
    /// * `max_load_factor` - The maximum load factor (positive, finite).
    ///
    /// # Returns
    ///
    /// Self with the updated configuration.
    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Sets the target load factor used by `reserve`.
    pub fn with_reserve_load_factor(mut self, reserve_load_factor: f64) -> Self {
        self.reserve_load_factor = reserve_load_factor;
        self
    }

    /// Sets the key and value kinds.
    pub fn with_kinds(mut self, key_kind: ValueKind, value_kind: ValueKind) -> Self {
        self.key_kind = key_kind;
        self.value_kind = value_kind;
        self
    }

    /// Checks that the configuration describes a usable table.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::Configuration`] when the bucket count is
    /// zero or a load factor is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.initial_bucket_count == 0 {
            return Err(HaleChainMapError::Configuration(
                "initial_bucket_count must be greater than 0".to_string(),
            ));
        }

        for (name, factor) in [
            ("max_load_factor", self.max_load_factor),
            ("reserve_load_factor", self.reserve_load_factor),
        ] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(HaleChainMapError::Configuration(format!(
                    "{name} must be a positive finite number, got {factor}"
                )));
            }
        }

        Ok(())
    }
}

impl Default for HaleChainMapConfig {
    fn default() -> Self {
        Self {
            initial_bucket_count: 16,
            max_load_factor: 0.75,
            reserve_load_factor: 0.6,
            key_kind: ValueKind::String,
            value_kind: ValueKind::String,
        }
    }
}
