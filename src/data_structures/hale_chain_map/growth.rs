// Copyright (c) 2025 Hale Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Load-factor driven growth decisions.

/// Decides when and how far the bucket array grows.
///
/// The policy never shrinks the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthPolicy {
    max_load_factor: f64,
    reserve_load_factor: f64,
}

impl GrowthPolicy {
    /// Creates a policy. Both factors must be positive and finite; the table
    /// configuration validates this before a policy is built.
    pub fn new(max_load_factor: f64, reserve_load_factor: f64) -> Self {
        Self {
            max_load_factor,
            reserve_load_factor,
        }
    }

    /// Load factor above which an insertion triggers growth.
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Target load factor used by `reserve`.
    pub fn reserve_load_factor(&self) -> f64 {
        self.reserve_load_factor
    }

    /// Load factor the table would have after one more entry.
    pub fn projected_load(&self, size: usize, bucket_count: usize) -> f64 {
        (size as f64 + 1.0) / bucket_count.max(1) as f64
    }

    /// Returns the bucket count to grow to before inserting one more entry,
    /// or `None` when the projected load stays within the limit.
    ///
    /// The count doubles (at least to 2) until the projected load fits. For
    /// any load factor of 0.5 or more this is a single doubling.
    pub fn growth_target(&self, size: usize, bucket_count: usize) -> Option<usize> {
        if self.projected_load(size, bucket_count) <= self.max_load_factor {
            return None;
        }

        let mut target = bucket_count;
        loop {
            target = target.saturating_mul(2).max(2);
            if self.projected_load(size, target) <= self.max_load_factor || target == usize::MAX {
                return Some(target);
            }
        }
    }

    /// Returns the bucket count needed to hold `expected` entries at the
    /// reserve load factor, or `None` if the current count already suffices.
    pub fn reserve_target(&self, expected: usize, bucket_count: usize) -> Option<usize> {
        if expected == 0 {
            return None;
        }
        let required = (expected as f64 / self.reserve_load_factor).ceil();
        let required = if required >= usize::MAX as f64 {
            usize::MAX
        } else {
            (required as usize).max(1)
        };
        (required > bucket_count).then_some(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_triggers_on_projected_load() {
        let policy = GrowthPolicy::new(0.75, 0.6);

        assert_eq!(policy.growth_target(0, 4), None);
        assert_eq!(policy.growth_target(2, 4), None); // 3/4 == 0.75
        assert_eq!(policy.growth_target(3, 4), Some(8)); // 4/4 > 0.75
    }

    #[test]
    fn test_growth_from_single_bucket() {
        let policy = GrowthPolicy::new(0.75, 0.6);
        assert_eq!(policy.growth_target(0, 1), Some(2));
    }

    #[test]
    fn test_small_load_factor_doubles_until_it_fits() {
        let policy = GrowthPolicy::new(0.1, 0.05);
        // 1 entry needs 10 buckets: 1 -> 2 -> 4 -> 8 -> 16.
        assert_eq!(policy.growth_target(0, 1), Some(16));
    }

    #[test]
    fn test_reserve_only_grows() {
        let policy = GrowthPolicy::new(0.75, 0.6);

        assert_eq!(policy.reserve_target(0, 4), None);
        assert_eq!(policy.reserve_target(6, 16), None);
        assert_eq!(policy.reserve_target(6, 4), Some(10));
        // 5 / 0.6 = 8.33, rounded up so the target load is really met.
        assert_eq!(policy.reserve_target(5, 4), Some(9));
    }
}
