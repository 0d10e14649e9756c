//! Data structures for Hale.
//!
//! This module contains the instrumented hash table at the heart of the
//! crate. Implementations adhere to the project requirements:
//! - No unsafe code
//! - Single-threaded, synchronous operations with no internal locking
//! - Every internal step observable through the step trace

pub mod hale_chain_map;

// Re-export common data structures
pub use hale_chain_map::{
    HaleChainMap, HaleChainMapConfig, HaleChainMapError, TaggedValue, ValueKind,
};
