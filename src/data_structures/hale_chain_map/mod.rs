// Copyright (c) 2025 Hale Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Hale Chain Map: an instrumented open-chaining hash table.
//!
//! The table stores key/value pairs whose keys and values are each one of a
//! small closed set of primitive kinds ([`ValueKind`]). It grows by doubling
//! to keep its load factor bounded, and narrates every operation into a step
//! trace that observers can display.
//!
//! # Features
//!
//! - Separate chaining with most-recently-inserted-first chains
//! - Growth decided before every insertion, even ones that end up updating
//! - Kind-checked keys and values; mismatches are traced, never fatal
//! - Full step history with one separator line per operation
//!
//! # Example
//!
//! ```
//! use hale_lib::data_structures::hale_chain_map::{HaleChainMap, HaleChainMapConfig, TaggedValue, ValueKind};
//!
//! let config = HaleChainMapConfig::new()
//!     .with_initial_bucket_count(4)
//!     .with_max_load_factor(0.75)
//!     .with_kinds(ValueKind::String, ValueKind::Integer);
//! let mut table = HaleChainMap::with_config(config).unwrap();
//!
//! assert!(table.insert("a", 1));
//! assert!(table.insert("b", 2));
//! assert!(table.insert("c", 3));
//! assert_eq!(table.bucket_count(), 4);
//!
//! // The fourth insertion would reach load 1.0, so the table doubles first.
//! assert!(table.insert("d", 4));
//! assert_eq!(table.bucket_count(), 8);
//!
//! assert_eq!(table.get(&"c".into()), Some(TaggedValue::Integer(3)));
//! assert!(!table.insert("c", 30)); // insert never overwrites
//! ```
//!
//! # Step trace
//!
//! Every public operation opens a section in the trace:
//!
//! ```
//! use hale_lib::data_structures::hale_chain_map::{HaleChainMap, TaggedValue};
//!
//! let mut table = HaleChainMap::new();
//! table.put("x", "red");
//! table.get(&TaggedValue::from("x"));
//!
//! assert_eq!(table.last_steps().last().unwrap(), "Found → return value red");
//! assert!(table.steps().iter().any(|s| s == "=== #1 put(x, red)"));
//! ```

mod bucket;
mod chain;
mod config;
mod error;
mod growth;
mod hash;
mod table;
mod trace;
mod value;

// Re-exports
pub use chain::Entry;
pub use config::HaleChainMapConfig;
pub use error::{EntryRole, HaleChainMapError, Result};
pub use hash::HashIndexer;
pub use table::{HaleChainMap, TableSnapshot};
pub use trace::{is_separator, StepRecorder, STEP_TARGET};
pub use value::{TaggedValue, ValueKind};
