// Copyright (c) 2025 Hale Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The bucket array and its redistribution.

use super::chain::{Chain, Entry};
use super::error::{HaleChainMapError, Result};
use super::hash::HashIndexer;
use super::trace::StepRecorder;

/// Array of chains addressed by bucket index.
///
/// Always holds at least one bucket.
#[derive(Debug)]
pub struct BucketTable {
    buckets: Vec<Chain>,
}

impl BucketTable {
    /// Creates `bucket_count` empty buckets (at least one).
    pub fn new(bucket_count: usize) -> Self {
        Self {
            buckets: std::iter::repeat_with(Chain::new)
                .take(bucket_count.max(1))
                .collect(),
        }
    }

    /// Fallible form of [`BucketTable::new`] for caller-supplied counts.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::Allocation`] if the array cannot be
    /// allocated.
    pub fn try_new(bucket_count: usize) -> Result<Self> {
        Ok(Self {
            buckets: empty_buckets(bucket_count.max(1))?,
        })
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// The chain at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::EmptyTable`] if the index is out of range.
    pub fn chain(&self, index: usize) -> Result<&Chain> {
        self.buckets.get(index).ok_or(HaleChainMapError::EmptyTable)
    }

    /// Mutable access to the chain at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::EmptyTable`] if the index is out of range.
    pub fn chain_mut(&mut self, index: usize) -> Result<&mut Chain> {
        self.buckets
            .get_mut(index)
            .ok_or(HaleChainMapError::EmptyTable)
    }

    /// Iterates the chains in bucket order.
    pub fn chains(&self) -> impl Iterator<Item = &Chain> + '_ {
        self.buckets.iter()
    }

    /// Total number of entries across all chains.
    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(Chain::len).sum()
    }

    /// Empties every chain, keeping the bucket count.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Chain::clear);
    }

    /// Redistributes every entry into `new_bucket_count` fresh buckets.
    ///
    /// Entries are drained bucket by bucket, each chain from head to tail, and
    /// moved into the new array under their recomputed index. The new array
    /// replaces the old one only after every entry has been moved.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::Allocation`] if the new array cannot be
    /// allocated and [`HaleChainMapError::EmptyTable`] if an index cannot be
    /// computed. The table is left unchanged in either case.
    pub fn rehash(
        &mut self,
        new_bucket_count: usize,
        indexer: &HashIndexer,
        recorder: &mut StepRecorder,
    ) -> Result<()> {
        let new_bucket_count = new_bucket_count.max(1);
        let mut fresh = empty_buckets(new_bucket_count)?;
        recorder.record(format!("Rehashing to {new_bucket_count} buckets"));

        // Plan every destination first so a failure cannot leave entries
        // split between two arrays.
        let destinations = self
            .buckets
            .iter()
            .flat_map(Chain::iter)
            .map(|entry| indexer.index(entry.key(), new_bucket_count))
            .collect::<Result<Vec<_>>>()?;

        let drained = self
            .buckets
            .iter_mut()
            .flat_map(|chain| std::iter::from_fn(move || chain.pop_front()));
        for (entry, index) in drained.zip(destinations) {
            recorder.record(format!(
                "Move ({},{}) → bucket {index}",
                entry.key(),
                entry.value()
            ));
            fresh[index].push_front(entry);
        }

        self.buckets = fresh;
        Ok(())
    }

    /// Chain lengths in bucket order.
    pub fn sizes(&self) -> Vec<usize> {
        self.buckets.iter().map(Chain::len).collect()
    }

    /// Iterates all entries in bucket-then-chain order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.buckets.iter().flat_map(Chain::iter)
    }
}

fn empty_buckets(count: usize) -> Result<Vec<Chain>> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(count)
        .map_err(|_| HaleChainMapError::Allocation {
            bucket_count: count,
        })?;
    buckets.resize_with(count, Chain::new);
    Ok(buckets)
}
