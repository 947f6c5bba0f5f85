// Copyright 2026 Verdex (https://github.com/verdex-eval/verdex)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types shared across the Verdex workspace.
//!
//! Three families of failure exist and are handled differently:
//! input errors halt a run before any row is evaluated, configuration
//! errors refuse the requested operation, and metric errors are caught
//! per metric and downgraded to an `Error` verdict so the batch always
//! runs to completion.

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, VerdexError>;

/// All errors produced by the Verdex crates.
#[derive(Debug, Error)]
pub enum VerdexError {
    // --- Input errors: the dataset cannot be evaluated at all ---
    /// Dataset file extension is neither `.csv` nor `.json`.
    #[error("Unsupported dataset format: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),

    /// A mandatory column is missing or holds no usable data.
    #[error("Essential column '{0}' is missing or entirely empty")]
    MissingColumn(String),

    /// The dataset parsed but its shape is unusable.
    #[error("Malformed dataset: {0}")]
    MalformedInput(String),

    /// Underlying file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse/write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // --- Configuration errors: the requested run is invalid ---
    /// A selected metric name is not registered.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// The metric selection was empty.
    #[error("No metrics selected for evaluation")]
    EmptyMetricSelection,

    /// The overall-pass criterion string did not parse.
    #[error("Invalid pass criterion: {0} (expected all-pass or any-pass)")]
    InvalidCriterion(String),

    /// A threshold override is outside [0, 1].
    #[error("Invalid threshold for '{metric}': {value} (must be within 0.0..=1.0)")]
    InvalidThreshold { metric: String, value: f64 },

    /// Run-configuration file problem.
    #[error("Configuration error: {0}")]
    Config(String),

    // --- Metric errors: confined to one metric on one row ---
    /// A metric computation failed; the row evaluator downgrades this
    /// to an `Error` verdict and keeps going.
    #[error("Metric failure: {0}")]
    Metric(String),
}
