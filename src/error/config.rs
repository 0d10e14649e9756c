//! Errors raised by the layered configuration loader.
//!
//! Covers a missing `--config` file, files the `config` crate cannot parse
//! or deserialize into `HaleConfig`, and values rejected by `Validate`.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while building a `HaleConfig` from defaults, file and environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file passed to the loader does not exist.
    #[error("config file {0} does not exist")]
    FileNotFound(PathBuf),

    /// The file has an unsupported extension, bad syntax, or fields that do
    /// not deserialize (an unknown value kind, for instance).
    #[error("cannot read configuration: {0}")]
    ParseError(String),

    /// A section's `Validate` check failed; the message names the section.
    #[error("invalid setting: {0}")]
    ValidationError(String),
}
