// Copyright (c) 2025 Hale Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Append-only step trace.
//!
//! Every public table operation opens a new section with a separator line and
//! then records one line per internal step. History is never discarded. The
//! recorder is write-only from the table's point of view: nothing in the table
//! reads it back to make a decision.

/// Prefix that marks a separator line.
pub const SEPARATOR_PREFIX: &str = "=== ";

/// `tracing` target used to mirror recorded steps.
pub const STEP_TARGET: &str = "hale::steps";

/// Ordered log of human-readable operation steps.
#[derive(Debug, Clone, Default)]
pub struct StepRecorder {
    steps: Vec<String>,
    operations: usize,
    last_separator: Option<usize>,
}

impl StepRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new operation section.
    pub fn begin(&mut self, operation: &str) {
        self.operations += 1;
        self.last_separator = Some(self.steps.len());
        self.steps
            .push(format!("{SEPARATOR_PREFIX}#{} {operation}", self.operations));
    }

    /// Records one step.
    pub fn record(&mut self, step: impl Into<String>) {
        let step = step.into();
        tracing::trace!(target: STEP_TARGET, "{step}");
        self.steps.push(step);
    }

    /// Full history, separators included.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Lines recorded since the most recent separator, the separator itself
    /// excluded.
    pub fn last_operation(&self) -> &[String] {
        match self.last_separator {
            Some(start) => &self.steps[start + 1..],
            None => &self.steps,
        }
    }

    /// Number of operation sections opened so far.
    pub fn operation_count(&self) -> usize {
        self.operations
    }

    /// Total number of recorded lines.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Returns `true` if `line` is a section separator.
pub fn is_separator(line: &str) -> bool {
    line.starts_with(SEPARATOR_PREFIX)
}
