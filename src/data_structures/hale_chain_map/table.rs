// Copyright (c) 2025 Hale Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Implementation of the Hale chain map.
//!
//! The map combines the bucket array, the growth policy and the indexer, and
//! narrates each operation into its [`StepRecorder`]. All operations run to
//! completion on the calling thread; there is no internal locking.

use serde::Serialize;
use tracing::{debug, warn};

use super::bucket::BucketTable;
use super::chain::Entry;
use super::config::HaleChainMapConfig;
use super::error::{EntryRole, HaleChainMapError, Result};
use super::growth::GrowthPolicy;
use super::hash::HashIndexer;
use super::trace::StepRecorder;
use super::value::{TaggedValue, ValueKind};

/// An open-chaining hash table over tagged primitive keys and values.
///
/// Every stored key carries the configured key kind and every stored value
/// the configured value kind. The table grows by doubling whenever an
/// insertion would push the load factor above the configured maximum, and it
/// never shrinks except through [`HaleChainMap::reset`].
#[derive(Debug)]
pub struct HaleChainMap {
    /// The bucket array
    buckets: BucketTable,

    /// Number of live entries
    size: usize,

    /// Growth and reserve sizing
    policy: GrowthPolicy,

    /// Kind required of every key
    key_kind: ValueKind,

    /// Kind required of every value
    value_kind: ValueKind,

    /// Bucket index computation
    indexer: HashIndexer,

    /// Observational step trace
    recorder: StepRecorder,
}

/// Serializable view of a table, values rendered with their display form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot {
    /// Configured key kind
    pub key_kind: ValueKind,
    /// Configured value kind
    pub value_kind: ValueKind,
    /// Number of entries
    pub size: usize,
    /// Number of buckets
    pub bucket_count: usize,
    /// Current load factor
    pub load_factor: f64,
    /// Growth threshold
    pub max_load_factor: f64,
    /// Bucket contents in chain order
    pub buckets: Vec<Vec<(String, String)>>,
}

impl HaleChainMap {
    /// Creates an empty table with the default configuration
    /// (16 buckets, load factor 0.75, String keys and values).
    pub fn new() -> Self {
        let config = HaleChainMapConfig::default();
        Self::build(&config, BucketTable::new(config.initial_bucket_count))
    }

    /// Creates an empty table from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::Configuration`] if the configuration is
    /// invalid and [`HaleChainMapError::Allocation`] if the buckets cannot be
    /// allocated.
    pub fn with_config(config: HaleChainMapConfig) -> Result<Self> {
        config.validate()?;
        let buckets = BucketTable::try_new(config.initial_bucket_count)?;
        Ok(Self::build(&config, buckets))
    }

    /// Creates an empty String/String table with the given bucket count and
    /// maximum load factor.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::Configuration`] if the bucket count is
    /// zero or the load factor is not positive and finite.
    pub fn with_buckets(initial_bucket_count: usize, max_load_factor: f64) -> Result<Self> {
        Self::with_config(
            HaleChainMapConfig::new()
                .with_initial_bucket_count(initial_bucket_count)
                .with_max_load_factor(max_load_factor),
        )
    }

    fn build(config: &HaleChainMapConfig, buckets: BucketTable) -> Self {
        Self {
            buckets,
            size: 0,
            policy: GrowthPolicy::new(config.max_load_factor, config.reserve_load_factor),
            key_kind: config.key_kind,
            value_kind: config.value_kind,
            indexer: HashIndexer::new(),
            recorder: StepRecorder::new(),
        }
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.bucket_count()
    }

    /// Current `size / bucket_count`.
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.bucket_count() as f64
    }

    /// Load factor above which insertions trigger growth.
    pub fn max_load_factor(&self) -> f64 {
        self.policy.max_load_factor()
    }

    /// Kind required of keys.
    pub fn key_kind(&self) -> ValueKind {
        self.key_kind
    }

    /// Kind required of values.
    pub fn value_kind(&self) -> ValueKind {
        self.value_kind
    }

    /// Parses `raw` as a key of the configured key kind.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::InvalidConversion`] on malformed input.
    pub fn parse_key(&self, raw: &str) -> Result<TaggedValue> {
        TaggedValue::parse(raw, self.key_kind)
    }

    /// Parses `raw` as a value of the configured value kind.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::InvalidConversion`] on malformed input.
    pub fn parse_value(&self, raw: &str) -> Result<TaggedValue> {
        TaggedValue::parse(raw, self.value_kind)
    }

    /// Inserts `key` → `value` only if `key` is absent.
    ///
    /// Returns `true` if a new entry was added. An existing key is never
    /// updated. A key or value of the wrong kind is rejected with a trace
    /// line and `false`.
    pub fn insert(&mut self, key: impl Into<TaggedValue>, value: impl Into<TaggedValue>) -> bool {
        self.try_insert(key.into(), value.into()).unwrap_or(false)
    }

    /// Fallible form of [`HaleChainMap::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::TypeMismatch`] when the key or value kind
    /// differs from the configured one.
    pub fn try_insert(&mut self, key: TaggedValue, value: TaggedValue) -> Result<bool> {
        self.recorder.begin(&format!("insert({key}, {value})"));
        self.emplace(key, value, false)
    }

    /// Inserts `key` → `value`, overwriting the value if `key` is present.
    ///
    /// Returns `true` if a new entry was added and `false` on update or on a
    /// rejected kind.
    pub fn put(&mut self, key: impl Into<TaggedValue>, value: impl Into<TaggedValue>) -> bool {
        self.try_put(key.into(), value.into()).unwrap_or(false)
    }

    /// Fallible form of [`HaleChainMap::put`].
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::TypeMismatch`] when the key or value kind
    /// differs from the configured one.
    pub fn try_put(&mut self, key: TaggedValue, value: TaggedValue) -> Result<bool> {
        self.recorder.begin(&format!("put({key}, {value})"));
        self.emplace(key, value, true)
    }

    /// Looks up the value stored under `key`.
    pub fn get(&mut self, key: &TaggedValue) -> Option<TaggedValue> {
        self.try_get(key).ok()
    }

    /// Fallible form of [`HaleChainMap::get`].
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::KeyNotFound`] if the key is absent and
    /// [`HaleChainMapError::TypeMismatch`] if it has the wrong kind.
    pub fn try_get(&mut self, key: &TaggedValue) -> Result<TaggedValue> {
        self.recorder.begin(&format!("get({key})"));
        self.lookup(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&mut self, key: &TaggedValue) -> bool {
        self.recorder.begin(&format!("contains({key})"));
        self.lookup(key).is_ok()
    }

    /// Removes the entry stored under `key`. Returns `true` if one was removed.
    pub fn erase(&mut self, key: &TaggedValue) -> bool {
        self.try_erase(key).is_ok()
    }

    /// Fallible form of [`HaleChainMap::erase`], returning the removed value.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::KeyNotFound`] if the key is absent and
    /// [`HaleChainMapError::TypeMismatch`] if it has the wrong kind.
    pub fn try_erase(&mut self, key: &TaggedValue) -> Result<TaggedValue> {
        self.recorder.begin(&format!("erase({key})"));
        self.check_kind(EntryRole::Key, key)
            .map_err(|err| self.reject(err))?;

        let index = self.locate(key)?;
        let recorder = &mut self.recorder;
        let removed = self
            .buckets
            .chain_mut(index)?
            .remove_with(key, |entry, hit| record_comparison(recorder, entry.key(), key, hit));

        match removed {
            Some(entry) => {
                self.size -= 1;
                let step = format!(
                    "Erased node. New size = {}, load factor = {:.2}",
                    self.size,
                    self.load_factor()
                );
                self.recorder.record(step);
                self.debug_check_size();
                Ok(entry.into_parts().1)
            }
            None => {
                self.recorder.record("Reached end of chain → key not found");
                Err(HaleChainMapError::KeyNotFound)
            }
        }
    }

    /// Returns the key of the first entry whose value equals `value`.
    ///
    /// Unlike the key operations this is a full linear scan over every bucket
    /// and every chain, in bucket-then-chain order: O(total entries). Values
    /// are not hashed, so there is nothing to narrow the search.
    pub fn find_by_value(&mut self, value: &TaggedValue) -> Option<TaggedValue> {
        self.recorder.begin(&format!("find_by_value({value})"));
        if let Err(err) = self.check_kind(EntryRole::Value, value) {
            self.reject(err);
            return None;
        }

        let recorder = &mut self.recorder;
        for (index, chain) in self.buckets.chains().enumerate() {
            if chain.is_empty() {
                continue;
            }
            recorder.record(format!("Scan bucket {index} ({} entries)", chain.len()));
            for entry in chain {
                let hit = entry.value() == value;
                recorder.record(format!(
                    "Compare values: {} == {value} ? {}",
                    entry.value(),
                    yes_no(hit)
                ));
                if hit {
                    recorder.record(format!(
                        "Found value in bucket {index} → key {}",
                        entry.key()
                    ));
                    return Some(entry.key().clone());
                }
            }
        }
        recorder.record("Scanned every bucket → value not found");
        None
    }

    /// Removes every entry. The bucket count is unchanged.
    pub fn clear(&mut self) {
        self.recorder.begin("clear");
        self.clear_entries();
        self.recorder.record("Cleared all buckets");
    }

    /// Grows the table so that `expected` entries fit at the reserve load
    /// factor. Never shrinks.
    pub fn reserve(&mut self, expected: usize) {
        self.recorder.begin(&format!("reserve({expected})"));
        let bucket_count = self.bucket_count();
        match self.policy.reserve_target(expected, bucket_count) {
            Some(target) => {
                self.recorder
                    .record(format!("Reserve({expected}) → rehash to {target} buckets"));
                self.grow_to(target);
            }
            None => self.recorder.record(format!(
                "Reserve({expected}) → {bucket_count} buckets already sufficient"
            )),
        }
    }

    /// Redistributes all entries into `new_bucket_count` buckets.
    ///
    /// Requests below the current bucket count are refused, since the table
    /// never shrinks; the refusal is traced and `false` returned. A count of
    /// zero is treated as one.
    pub fn rehash(&mut self, new_bucket_count: usize) -> bool {
        self.recorder.begin(&format!("rehash({new_bucket_count})"));
        let new_bucket_count = new_bucket_count.max(1);
        let bucket_count = self.bucket_count();
        if new_bucket_count < bucket_count {
            self.recorder.record(format!(
                "Refused: {new_bucket_count} is below the current {bucket_count} buckets"
            ));
            return false;
        }
        self.grow_to(new_bucket_count)
    }

    /// Changes the key and value kinds. Always clears the table, since
    /// existing entries would no longer match the configured kinds.
    pub fn reconfigure(&mut self, key_kind: ValueKind, value_kind: ValueKind) {
        self.recorder
            .begin(&format!("reconfigure({key_kind}, {value_kind})"));
        let dropped = self.size;
        self.clear_entries();
        self.key_kind = key_kind;
        self.value_kind = value_kind;
        self.recorder.record(format!(
            "Key kind = {key_kind}, value kind = {value_kind}; cleared {dropped} entries"
        ));
        debug!(%key_kind, %value_kind, dropped, "Reconfigured table kinds");
    }

    /// Replaces the whole configuration, dropping every entry. This is the
    /// only operation that may lower the bucket count. The step history is
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::Configuration`] if `config` is invalid
    /// and [`HaleChainMapError::Allocation`] if its buckets cannot be
    /// allocated; the table is unchanged in either case.
    pub fn reset(&mut self, config: HaleChainMapConfig) -> Result<()> {
        config.validate()?;
        let buckets = BucketTable::try_new(config.initial_bucket_count)?;
        self.recorder.begin("reset");
        let recorder = std::mem::take(&mut self.recorder);
        *self = Self {
            recorder,
            ..Self::build(&config, buckets)
        };
        self.recorder.record(format!(
            "Reset to {} buckets, max load factor {:.2}, key kind {}, value kind {}",
            config.initial_bucket_count, config.max_load_factor, config.key_kind, config.value_kind
        ));
        debug!(?config, "Reset table configuration");
        Ok(())
    }

    /// Appends an externally supplied line to the step trace.
    pub fn annotate(&mut self, note: impl Into<String>) {
        self.recorder.record(note);
    }

    /// Full step history.
    pub fn steps(&self) -> &[String] {
        self.recorder.steps()
    }

    /// Steps recorded by the most recent operation.
    pub fn last_steps(&self) -> &[String] {
        self.recorder.last_operation()
    }

    /// The step recorder.
    pub fn recorder(&self) -> &StepRecorder {
        &self.recorder
    }

    /// Chain length of every bucket, in bucket order.
    pub fn bucket_sizes(&self) -> Vec<usize> {
        self.buckets.sizes()
    }

    /// Key/value pairs of every bucket, each chain in storage order.
    pub fn bucket_contents(&self) -> Vec<Vec<(TaggedValue, TaggedValue)>> {
        self.buckets
            .chains()
            .map(|chain| {
                chain
                    .iter()
                    .map(|entry| (entry.key().clone(), entry.value().clone()))
                    .collect()
            })
            .collect()
    }

    /// Iterates entries in bucket-then-chain order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.buckets.entries()
    }

    /// Serializable summary of the current state.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            key_kind: self.key_kind,
            value_kind: self.value_kind,
            size: self.size,
            bucket_count: self.bucket_count(),
            load_factor: self.load_factor(),
            max_load_factor: self.max_load_factor(),
            buckets: self
                .buckets
                .chains()
                .map(|chain| {
                    chain
                        .iter()
                        .map(|entry| (entry.key().to_string(), entry.value().to_string()))
                        .collect()
                })
                .collect(),
        }
    }

    fn emplace(&mut self, key: TaggedValue, value: TaggedValue, assign_if_exists: bool) -> Result<bool> {
        self.check_kind(EntryRole::Key, &key)
            .and_then(|()| self.check_kind(EntryRole::Value, &value))
            .map_err(|err| self.reject(err))?;

        // Growth is decided before the lookup, so an update can still grow.
        self.maybe_grow()?;

        let index = self.locate(&key)?;
        let recorder = &mut self.recorder;
        let chain = self.buckets.chain_mut(index)?;

        if let Some(entry) =
            chain.find_mut_with(&key, |entry, hit| record_comparison(recorder, entry.key(), &key, hit))
        {
            if assign_if_exists {
                let old = entry.replace_value(value);
                recorder.record(format!(
                    "Key exists → update value: {old} → {}",
                    entry.value()
                ));
            } else {
                recorder.record("Key exists → no insert (duplicate)");
            }
            return Ok(false);
        }

        recorder.record(format!("Prepend new node to bucket {index}"));
        chain.push_front(Entry::new(key, value));
        self.size += 1;

        let step = format!(
            "New size = {}, load factor = {:.2}",
            self.size,
            self.load_factor()
        );
        self.recorder.record(step);
        self.debug_check_size();
        Ok(true)
    }

    fn lookup(&mut self, key: &TaggedValue) -> Result<TaggedValue> {
        self.check_kind(EntryRole::Key, key)
            .map_err(|err| self.reject(err))?;

        let index = self.locate(key)?;
        let recorder = &mut self.recorder;
        let found = self
            .buckets
            .chain(index)?
            .find_with(key, |entry, hit| record_comparison(recorder, entry.key(), key, hit))
            .map(|entry| entry.value().clone());

        match found {
            Some(value) => {
                self.recorder.record(format!("Found → return value {value}"));
                Ok(value)
            }
            None => {
                self.recorder.record("Reached end of chain → not found");
                Err(HaleChainMapError::KeyNotFound)
            }
        }
    }

    /// Computes and traces the bucket index for `key`.
    fn locate(&mut self, key: &TaggedValue) -> Result<usize> {
        let bucket_count = self.bucket_count();
        let hash = self.indexer.hash(key);
        let index = match self.indexer.reduce(hash, bucket_count) {
            Ok(index) => index,
            Err(err) => {
                self.recorder.record("Table is empty → no bucket to visit");
                return Err(err);
            }
        };
        self.recorder.record(format!("Compute hash({key}) = {hash}"));
        self.recorder
            .record(format!("Index = hash % {bucket_count} = {index}"));
        self.recorder.record(format!("Visit bucket {index}"));
        Ok(index)
    }

    fn maybe_grow(&mut self) -> Result<()> {
        let bucket_count = self.bucket_count();
        let Some(target) = self.policy.growth_target(self.size, bucket_count) else {
            return Ok(());
        };

        let projected = self.policy.projected_load(self.size, bucket_count);
        let step = format!(
            "Load factor {:.2} → projected {projected:.2} exceeds {:.2} → rehash to {target} buckets",
            self.load_factor(),
            self.max_load_factor()
        );
        self.recorder.record(step);
        debug!(
            size = self.size,
            from = bucket_count,
            to = target,
            projected,
            "Growing table"
        );
        self.buckets
            .rehash(target, &self.indexer, &mut self.recorder)
            .map_err(|err| self.reject(err))
    }

    fn grow_to(&mut self, target: usize) -> bool {
        let from = self.bucket_count();
        match self.buckets.rehash(target, &self.indexer, &mut self.recorder) {
            Ok(()) => {
                debug!(from, to = target, size = self.size, "Rehashed table");
                true
            }
            Err(err) => {
                self.reject(err);
                false
            }
        }
    }

    fn clear_entries(&mut self) {
        self.buckets.clear();
        self.size = 0;
    }

    fn check_kind(&self, role: EntryRole, value: &TaggedValue) -> Result<()> {
        let expected = match role {
            EntryRole::Key => self.key_kind,
            EntryRole::Value => self.value_kind,
        };
        if !value.is_kind(expected) {
            Err(HaleChainMapError::TypeMismatch {
                role,
                expected,
                actual: value.kind(),
            })
        } else if value.is_nan() {
            Err(HaleChainMapError::NotANumber {
                role,
                kind: expected,
            })
        } else {
            Ok(())
        }
    }

    /// Traces a failed operation and hands the error back.
    fn reject(&mut self, err: HaleChainMapError) -> HaleChainMapError {
        self.recorder.record(format!("Rejected: {err}"));
        warn!(error = %err, "Table operation rejected");
        err
    }

    fn debug_check_size(&self) {
        debug_assert_eq!(self.size, self.buckets.entry_count(), "size out of sync with chains");
    }
}

impl Default for HaleChainMap {
    fn default() -> Self {
        Self::new()
    }
}

fn record_comparison(recorder: &mut StepRecorder, stored: &TaggedValue, probe: &TaggedValue, hit: bool) {
    recorder.record(format!("Compare keys: {stored} == {probe} ? {}", yes_no(hit)));
    if !hit {
        recorder.record("Traverse next in chain");
    }
}

fn yes_no(hit: bool) -> &'static str {
    if hit {
        "Yes"
    } else {
        "No"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_table(buckets: usize, load: f64) -> HaleChainMap {
        HaleChainMap::with_buckets(buckets, load).unwrap()
    }

    fn int_table() -> HaleChainMap {
        HaleChainMap::with_config(
            HaleChainMapConfig::new()
                .with_initial_bucket_count(4)
                .with_kinds(ValueKind::Integer, ValueKind::String),
        )
        .unwrap()
    }

    #[test]
    fn test_growth_scenario() {
        let mut table = HaleChainMap::with_config(
            HaleChainMapConfig::new()
                .with_initial_bucket_count(4)
                .with_max_load_factor(0.75)
                .with_kinds(ValueKind::String, ValueKind::Integer),
        )
        .unwrap();

        assert!(table.insert("a", 1));
        assert!(table.insert("b", 2));
        assert!(table.insert("c", 3));
        assert_eq!(table.size(), 3);
        assert_eq!(table.bucket_count(), 4);
        assert!((table.load_factor() - 0.75).abs() < f64::EPSILON);

        assert!(table.insert("d", 4));
        assert_eq!(table.size(), 4);
        assert_eq!(table.bucket_count(), 8);
        assert!(table
            .last_steps()
            .iter()
            .any(|s| s.contains("rehash to 8 buckets")));

        for (k, v) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
            assert_eq!(table.get(&k.into()), Some(TaggedValue::Integer(v)));
        }
    }

    #[test]
    fn test_put_overwrites() {
        let mut table = HaleChainMap::new();
        assert!(table.put("x", "red"));
        assert!(!table.put("x", "blue"));
        assert!(table
            .last_steps()
            .contains(&"Key exists → update value: red → blue".to_string()));
        assert_eq!(table.get(&"x".into()), Some(TaggedValue::from("blue")));
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn test_insert_never_updates() {
        let mut table = HaleChainMap::new();
        assert!(table.insert("k", "v1"));
        assert!(!table.insert("k", "v2"));
        assert_eq!(table.get(&"k".into()), Some(TaggedValue::from("v1")));
        assert_eq!(table.size(), 1);
        assert_eq!(
            table.last_steps().last().map(String::as_str),
            Some("Found → return value v1")
        );
    }

    #[test]
    fn test_growth_check_runs_before_update() {
        let mut table = string_table(2, 0.75);
        table.put("a", "1");
        assert_eq!(table.bucket_count(), 2);
        // projected (1 + 1) / 2 = 1.0 > 0.75, so the update still grows the table.
        assert!(!table.put("a", "2"));
        assert_eq!(table.bucket_count(), 4);
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn test_type_mismatch_is_rejected_and_traced() {
        let mut table = int_table();
        assert!(!table.insert("not-an-int", "v"));
        assert!(!table.insert(1, 2));
        assert_eq!(table.size(), 0);
        assert_eq!(
            table.try_put(TaggedValue::Double(1.0), "v".into()),
            Err(HaleChainMapError::TypeMismatch {
                role: EntryRole::Key,
                expected: ValueKind::Integer,
                actual: ValueKind::Double,
            })
        );
        assert!(table.last_steps()[0].starts_with("Rejected: Type mismatch"));
        assert_eq!(table.get(&"x".into()), None);
        assert!(table.find_by_value(&TaggedValue::Integer(3)).is_none());
    }

    #[test]
    fn test_nan_keys_and_values_are_never_stored() {
        let mut table = HaleChainMap::with_config(
            HaleChainMapConfig::new().with_kinds(ValueKind::Double, ValueKind::Float),
        )
        .unwrap();

        assert!(!table.put(f64::NAN, 1.0f32));
        assert!(!table.put(f64::NAN, 2.0f32));
        assert!(!table.insert(1.0f64, f32::NAN));
        assert_eq!(table.size(), 0);
        assert_eq!(
            table.try_put(TaggedValue::Double(f64::NAN), TaggedValue::Float(1.0)),
            Err(HaleChainMapError::NotANumber {
                role: EntryRole::Key,
                kind: ValueKind::Double,
            })
        );
        assert_eq!(
            table.last_steps().first().map(String::as_str),
            Some("Rejected: Invalid key: NaN is not a comparable Double")
        );
        assert_eq!(table.get(&TaggedValue::Double(f64::NAN)), None);
        assert_eq!(table.find_by_value(&TaggedValue::Float(f32::NAN)), None);

        assert!(table.put(1.0f64, 1.0f32));
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn test_erase_present_and_absent() {
        let mut table = int_table();
        table.insert(1, "one");
        table.insert(5, "five");
        table.insert(9, "nine");

        assert!(table.erase(&TaggedValue::Integer(5)));
        assert_eq!(table.size(), 2);
        assert_eq!(table.get(&TaggedValue::Integer(5)), None);

        assert!(!table.erase(&TaggedValue::Integer(5)));
        assert_eq!(table.size(), 2);
        assert_eq!(
            table.try_erase(&TaggedValue::Integer(42)),
            Err(HaleChainMapError::KeyNotFound)
        );
        assert_eq!(
            table.try_erase(&TaggedValue::Integer(9)),
            Ok(TaggedValue::from("nine"))
        );
    }

    #[test]
    fn test_find_by_value_scans_bucket_then_chain() {
        let mut table = int_table();
        // With 4 buckets: 1 and 5 share bucket 1, 2 lands in bucket 2.
        table.insert(2, "same");
        table.insert(1, "same");
        table.insert(5, "same");

        // Bucket 1 is scanned first; its chain head is 5.
        assert_eq!(
            table.find_by_value(&"same".into()),
            Some(TaggedValue::Integer(5))
        );
        assert_eq!(table.find_by_value(&"missing".into()), None);
        assert_eq!(
            table.last_steps().last().map(String::as_str),
            Some("Scanned every bucket → value not found")
        );
    }

    #[test]
    fn test_trace_of_chained_lookup() {
        let mut table = int_table();
        table.insert(1, "one");
        table.insert(5, "five");
        table.get(&TaggedValue::Integer(1));

        assert_eq!(
            table.last_steps(),
            &[
                "Compute hash(1) = 1",
                "Index = hash % 4 = 1",
                "Visit bucket 1",
                "Compare keys: 5 == 1 ? No",
                "Traverse next in chain",
                "Compare keys: 1 == 1 ? Yes",
                "Found → return value one",
            ]
        );
    }

    #[test]
    fn test_trace_keeps_history_with_separators() {
        let mut table = int_table();
        table.insert(1, "one");
        table.contains(&TaggedValue::Integer(1));
        table.clear();

        let separators: Vec<_> = table
            .steps()
            .iter()
            .filter(|s| super::super::trace::is_separator(s))
            .cloned()
            .collect();
        assert_eq!(
            separators,
            vec!["=== #1 insert(1, one)", "=== #2 contains(1)", "=== #3 clear"]
        );
        assert_eq!(table.last_steps(), &["Cleared all buckets"]);
    }

    #[test]
    fn test_clear_keeps_bucket_count() {
        let mut table = string_table(2, 0.75);
        for k in ["a", "b", "c", "d", "e"] {
            table.put(k, "v");
        }
        let buckets = table.bucket_count();
        table.clear();
        assert_eq!(table.size(), 0);
        assert_eq!(table.bucket_count(), buckets);
        assert!(!table.contains(&"a".into()));
        assert!(table.bucket_sizes().iter().all(|&n| n == 0));
    }

    #[test]
    fn test_reserve_and_rehash_never_shrink() {
        let mut table = string_table(4, 0.75);
        table.put("a", "1");

        table.reserve(3);
        assert_eq!(table.bucket_count(), 5);
        table.reserve(1);
        assert_eq!(table.bucket_count(), 5);

        assert!(!table.rehash(2));
        assert_eq!(table.bucket_count(), 5);
        assert!(table.rehash(11));
        assert_eq!(table.bucket_count(), 11);
        assert_eq!(table.get(&"a".into()), Some(TaggedValue::from("1")));
    }

    #[test]
    fn test_unallocatable_bucket_counts_are_refused() {
        let mut table = string_table(4, 0.75);
        table.put("a", "1");

        assert!(!table.rehash(usize::MAX / 2));
        assert_eq!(table.bucket_count(), 4);
        assert!(table
            .last_steps()
            .last()
            .is_some_and(|s| s.starts_with("Rejected: Cannot allocate")));

        table.reserve(usize::MAX);
        assert_eq!(table.bucket_count(), 4);
        assert_eq!(table.size(), 1);
        assert_eq!(table.get(&"a".into()), Some(TaggedValue::from("1")));

        assert!(matches!(
            HaleChainMap::with_buckets(usize::MAX, 0.75),
            Err(HaleChainMapError::Allocation { .. })
        ));
    }

    #[test]
    fn test_reconfigure_clears_entries() {
        let mut table = HaleChainMap::new();
        table.put("a", "1");
        table.reconfigure(ValueKind::Char, ValueKind::Float);

        assert_eq!(table.size(), 0);
        assert_eq!(table.bucket_count(), 16);
        assert!(table.insert('q', 1.5f32));
        assert_eq!(table.get(&'q'.into()), Some(TaggedValue::Float(1.5)));
        assert!(!table.insert("a", "1"));
    }

    #[test]
    fn test_reset_may_lower_bucket_count() {
        let mut table = string_table(64, 0.75);
        table.put("a", "1");
        let history = table.steps().len();

        table
            .reset(HaleChainMapConfig::new().with_initial_bucket_count(2))
            .unwrap();
        assert_eq!(table.bucket_count(), 2);
        assert!(table.is_empty());
        assert!(table.steps().len() > history);

        assert!(table
            .reset(HaleChainMapConfig::new().with_initial_bucket_count(0))
            .is_err());
        assert_eq!(table.bucket_count(), 2);
    }

    #[test]
    fn test_bucket_contents_reflect_chain_order() {
        let mut table = int_table();
        table.insert(1, "one");
        table.insert(5, "five");
        table.insert(2, "two");

        let contents = table.bucket_contents();
        assert_eq!(contents.len(), 4);
        assert_eq!(
            contents[1],
            vec![
                (TaggedValue::Integer(5), TaggedValue::from("five")),
                (TaggedValue::Integer(1), TaggedValue::from("one")),
            ]
        );
        assert_eq!(table.bucket_sizes(), vec![0, 2, 1, 0]);
        assert_eq!(table.iter().count(), 3);

        let snapshot = table.snapshot();
        assert_eq!(snapshot.buckets[2], vec![("2".to_string(), "two".to_string())]);
    }

    #[test]
    fn test_annotate_appends_without_separator() {
        let mut table = HaleChainMap::new();
        table.get(&"a".into());
        table.annotate("observer note");
        assert_eq!(table.last_steps().last().map(String::as_str), Some("observer note"));
    }

    #[test]
    fn test_parse_uses_configured_kinds() {
        let table = int_table();
        assert_eq!(table.parse_key("12").unwrap(), TaggedValue::Integer(12));
        assert!(table.parse_key("twelve").is_err());
        assert_eq!(table.parse_value("twelve").unwrap(), TaggedValue::from("twelve"));
    }
}
