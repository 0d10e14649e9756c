//! Test modules for Hale.
//!
//! This module contains the cross-module test suites:
//! - Configuration loading and validation
//! - Error reporting
//! - Chain map behavior driven from configuration and generated inputs
//! - Shared fixtures and proptest strategies

pub mod chain_map_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{tagged_value_strategy, value_kind_strategy, TestFixture};
