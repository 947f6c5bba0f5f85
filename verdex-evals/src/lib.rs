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

//! # Verdex Evaluation Engine
//!
//! Scores LLM text responses against human-authored expectations and
//! reduces per-metric scores into pass/fail verdicts, row by row over a
//! tabular dataset.
//!
//! ## Features
//!
//! - **Trait-based metric system**: new metrics implement [`Metric`]
//!   and register on a [`MetricRegistry`]
//! - **Built-in metrics**: fact adherence, safety, answer similarity,
//!   answer relevancy
//! - **Linguistic normalization**: lemmatized, number-aware token
//!   matching with a degraded fallback when resources are unavailable
//! - **Threshold-driven verdicts**: per-metric cut lines with caller
//!   overrides, `safety` pinned to 1.0
//! - **Fault isolation**: a failing or panicking metric records an
//!   `Error` verdict and the batch keeps going
//!
//! ## Example
//!
//! ```rust,ignore
//! use verdex_core::{Criterion, EvalTable, TestRecord};
//! use verdex_evals::{agreement, DatasetEvaluator};
//!
//! let table = EvalTable::from_records(vec![
//!     TestRecord::new("1", "What is the capital of France?")
//!         .with_llm_output("The capital is Paris and the cost was $500.")
//!         .with_required_facts("Paris; 500 dollars"),
//! ]);
//!
//! let evaluator = DatasetEvaluator::new().with_criterion(Criterion::AllPass);
//! let annotated = evaluator.evaluate(&table, &["fact_adherence".to_string()])?;
//! let report = agreement(&annotated, "initial_reviewer_verdict", "overall_verdict");
//! ```

use verdex_core::{MetricScore, TestRecord, VerdexError};

pub mod agreement;
pub mod dataset;
pub mod lexicon;
pub mod metrics;
pub mod normalize;
pub mod registry;
pub mod row;
pub mod thresholds;

pub use agreement::{agreement, AgreementReport};
pub use dataset::{summarize, DatasetEvaluator, EvalSummary, MetricTally};
pub use lexicon::{Lexicon, PartOfSpeech};
pub use metrics::{AnswerRelevancy, AnswerSimilarity, FactAdherence, Safety};
pub use normalize::Normalizer;
pub use registry::MetricRegistry;
pub use row::{MetricOutcome, RowEvaluator, RowResult};
pub use thresholds::{ThresholdResolver, DEFAULT_THRESHOLD, SAFETY_METRIC};

/// Core trait all metrics implement.
pub trait Metric: Send + Sync {
    /// Canonical metric name (e.g. `"fact_adherence"`); also the prefix
    /// of the result columns this metric produces.
    fn name(&self) -> &str;

    /// Score one record. `NotApplicable` means the metric's auxiliary
    /// input was absent, never that it found zero matches.
    fn compute(
        &self,
        record: &TestRecord,
        context: &EvalContext,
    ) -> Result<MetricScore, VerdexError>;

    /// Human-readable band for a score.
    fn describe(&self, score: MetricScore) -> String {
        match score {
            MetricScore::NotApplicable => "not applicable".to_string(),
            MetricScore::Value(v) => format!("score {:.2}", v),
        }
    }
}

/// Per-run inputs threaded unchanged to every row.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Cleaned (trimmed, lower-cased) sensitive keywords consumed by
    /// the safety metric.
    pub sensitive_keywords: Vec<String>,

    /// Shared normalizer handle; all rows observe the same mode.
    pub normalizer: Normalizer,
}

impl EvalContext {
    pub fn new() -> Self {
        Self {
            sensitive_keywords: Vec::new(),
            normalizer: Normalizer::shared(),
        }
    }

    /// Set the sensitive-keyword list, trimming, lower-casing and
    /// dropping empty entries.
    pub fn with_sensitive_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sensitive_keywords = keywords
            .into_iter()
            .filter_map(|k| {
                let cleaned = k.as_ref().trim().to_lowercase();
                if cleaned.is_empty() {
                    None
                } else {
                    Some(cleaned)
                }
            })
            .collect();
        self
    }

    /// Replace the normalizer, mainly to pin degraded mode in tests.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
