//! Hale Library
//!
//! This library contains the core of Hale: an instrumented open-chaining hash
//! table over tagged primitive keys and values, together with its
//! configuration and error handling. The library is used by the `hale`
//! binary, which stands in for a presentation layer, but can also be used as a
//! dependency by other projects.
//!
//! # Architecture
//!
//! Hale is designed with the following principles in mind:
//! - Strict component boundaries (value, hashing, buckets, growth, trace)
//! - Closed tagged unions with exhaustive matching instead of runtime type checks
//! - Comprehensive error handling and propagation
//! - Every internal step observable through an append-only trace

// Re-export public modules
pub mod config;
pub mod data_structures;
pub mod error;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for Hale.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function
pub fn init() -> error::HaleResult<()> {
    // Set up global error reporter with tracing
    error::set_error_reporter(std::sync::Arc::new(error::TracingErrorReporter));

    // Initialize default configuration
    config::init_default_config()?;

    Ok(())
}
