// Copyright (c) 2025 Hale Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Bucket index computation for the Hale chain map.
//!
//! Each kind has its own rule for turning a key into a 64-bit hash. The hash
//! is then reduced modulo the bucket count. The per-kind rules are part of the
//! table's observable behavior (they decide chain placement and therefore the
//! step trace), so they must stay stable across runs and platforms:
//!
//! - `String`: FNV-1a over the UTF-8 bytes.
//! - `Integer`: absolute value.
//! - `Double`/`Float`: truncated toward zero, then the integer rule.
//! - `Char`: hashed as a one-character string.

use std::hash::Hasher;

use fnv::FnvHasher;

use super::error::{HaleChainMapError, Result};
use super::value::TaggedValue;

/// Computes hashes and bucket indices for tagged keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashIndexer;

impl HashIndexer {
    /// Creates a new indexer.
    pub fn new() -> Self {
        Self
    }

    /// Returns the pre-reduction hash of `key`.
    pub fn hash(&self, key: &TaggedValue) -> u64 {
        match key {
            TaggedValue::String(s) => hash_str(s),
            TaggedValue::Integer(i) => u64::from(i.unsigned_abs()),
            // `as` saturates at the i64 range and truncates toward zero.
            TaggedValue::Double(d) => (*d as i64).unsigned_abs(),
            TaggedValue::Float(f) => (*f as i64).unsigned_abs(),
            TaggedValue::Char(c) => {
                let mut buf = [0u8; 4];
                hash_str(c.encode_utf8(&mut buf))
            }
        }
    }

    /// Maps `key` to a bucket index in `[0, bucket_count)`.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::EmptyTable`] if `bucket_count` is zero.
    pub fn index(&self, key: &TaggedValue, bucket_count: usize) -> Result<usize> {
        self.reduce(self.hash(key), bucket_count)
    }

    /// Reduces an already computed hash to a bucket index.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::EmptyTable`] if `bucket_count` is zero.
    pub fn reduce(&self, hash: u64, bucket_count: usize) -> Result<usize> {
        if bucket_count == 0 {
            return Err(HaleChainMapError::EmptyTable);
        }
        // The remainder is below bucket_count, so it always fits in usize.
        Ok((hash % bucket_count as u64) as usize)
    }
}

fn hash_str(s: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(s.as_bytes());
    hasher.finish()
}
