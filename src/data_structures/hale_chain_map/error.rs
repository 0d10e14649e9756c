// Copyright (c) 2025 Hale Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the Hale chain map.

use super::value::ValueKind;

/// Which half of an entry failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRole {
    /// The entry key
    Key,
    /// The entry value
    Value,
}

impl std::fmt::Display for EntryRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryRole::Key => f.write_str("key"),
            EntryRole::Value => f.write_str("value"),
        }
    }
}

/// Error types for Hale chain map operations
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum HaleChainMapError {
    /// A key or value does not carry the kind the table is configured for
    #[error("Type mismatch: {role} must be {expected}, got {actual}")]
    TypeMismatch {
        /// Whether the key or the value was rejected
        role: EntryRole,
        /// The configured kind
        expected: ValueKind,
        /// The kind that was supplied
        actual: ValueKind,
    },

    /// Text could not be converted to the requested kind
    #[error("Cannot convert {input:?} to {kind}")]
    InvalidConversion {
        /// The requested kind
        kind: ValueKind,
        /// The rejected input
        input: String,
    },

    /// A floating-point key or value is NaN, which never compares equal
    #[error("Invalid {role}: NaN is not a comparable {kind}")]
    NotANumber {
        /// Whether the key or the value was rejected
        role: EntryRole,
        /// The floating-point kind
        kind: ValueKind,
    },

    /// The bucket array could not be allocated
    #[error("Cannot allocate {bucket_count} buckets")]
    Allocation {
        /// The requested bucket count
        bucket_count: usize,
    },

    /// The key is not present in the table
    #[error("Key not found")]
    KeyNotFound,

    /// The bucket array is empty
    #[error("Table has no buckets")]
    EmptyTable,

    /// Configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Result type for Hale chain map operations
pub type Result<T> = std::result::Result<T, HaleChainMapError>;
