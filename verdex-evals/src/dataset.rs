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

//! Dataset evaluation.
//!
//! The sole entry point for scoring a loaded table. Configuration is
//! validated before the first row; after that every row is evaluated
//! independently and nothing a metric does can abort the batch. The
//! result is a new table carrying the input columns plus per-metric
//! score/verdict columns, the overall verdict and the reviewer-final
//! verdict. The input table is never touched.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use verdex_core::{columns, Criterion, EvalTable, MetricScore, Verdict, VerdexError};

use crate::registry::MetricRegistry;
use crate::row::RowEvaluator;
use crate::thresholds::ThresholdResolver;
use crate::{EvalContext, Metric};

/// Evaluates whole tables with a configured metric set.
pub struct DatasetEvaluator {
    registry: MetricRegistry,
    thresholds: HashMap<String, f64>,
    sensitive_keywords: Vec<String>,
    criterion: Criterion,
}

impl DatasetEvaluator {
    /// Evaluator backed by the built-in metrics.
    pub fn new() -> Self {
        Self::with_registry(MetricRegistry::with_builtins())
    }

    /// Evaluator backed by a caller-assembled registry.
    pub fn with_registry(registry: MetricRegistry) -> Self {
        Self {
            registry,
            thresholds: HashMap::new(),
            sensitive_keywords: Vec::new(),
            criterion: Criterion::default(),
        }
    }

    /// Per-metric threshold overrides (the safety threshold stays pinned).
    pub fn with_thresholds(mut self, thresholds: HashMap<String, f64>) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Keywords for the safety metric.
    pub fn with_sensitive_keywords(mut self, keywords: Vec<String>) -> Self {
        self.sensitive_keywords = keywords;
        self
    }

    /// Overall-verdict reduction rule (default: all-pass).
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Evaluate every record of `table` with the metrics named in
    /// `selection`, in selection order. Fails before the first row on
    /// an empty selection, an unknown metric name or a bad threshold.
    pub fn evaluate(&self, table: &EvalTable, selection: &[String]) -> Result<EvalTable, VerdexError> {
        if selection.is_empty() {
            return Err(VerdexError::EmptyMetricSelection);
        }
        let metrics = self.registry.select(selection)?;
        let resolver = ThresholdResolver::with_overrides(self.thresholds.clone())?;
        let context =
            EvalContext::new().with_sensitive_keywords(self.sensitive_keywords.iter());
        let row_evaluator = RowEvaluator::new(&metrics, &resolver, self.criterion);

        let mut annotated = table.clone();
        for metric in &metrics {
            annotated.push_column(&format!("{}_score", metric.name()));
            annotated.push_column(&format!("{}_verdict", metric.name()));
        }
        annotated.push_column(columns::OVERALL_VERDICT);
        annotated.push_column(columns::REVIEWER_FINAL_VERDICT);

        for record in annotated.records_mut() {
            let row = row_evaluator.evaluate(record, &context);

            for outcome in &row.outcomes {
                let score_cell = match outcome.score {
                    Some(score) => score.to_string(),
                    None => String::new(),
                };
                record.set_cell(&format!("{}_score", outcome.name), &score_cell);
                record.set_cell(&format!("{}_verdict", outcome.name), outcome.verdict.as_str());
            }

            record.set_cell(columns::OVERALL_VERDICT, row.overall.as_str());

            // A reviewer's explicit verdict wins; absent (N/A) falls
            // back to the automated overall verdict.
            let reviewer = record.initial_reviewer_verdict;
            let final_verdict = if reviewer == Verdict::NotApplicable {
                row.overall
            } else {
                reviewer
            };
            record.set_cell(columns::REVIEWER_FINAL_VERDICT, final_verdict.as_str());
        }

        info!(
            rows = annotated.len(),
            metrics = metrics.len(),
            "Dataset evaluation complete"
        );
        Ok(annotated)
    }
}

impl Default for DatasetEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-metric verdict counts over an annotated table.
#[derive(Debug, Clone, Serialize)]
pub struct MetricTally {
    pub name: String,
    pub pass: usize,
    pub fail: usize,
    pub not_applicable: usize,
    pub error: usize,
    /// Mean of the numeric scores, when any row produced one.
    pub mean_score: Option<f64>,
    /// Qualitative band for the mean score.
    pub description: String,
}

/// Summary statistics for an annotated table.
#[derive(Debug, Clone, Serialize)]
pub struct EvalSummary {
    pub rows: usize,
    pub overall_pass: usize,
    pub overall_fail: usize,
    pub overall_not_applicable: usize,
    pub metrics: Vec<MetricTally>,
}

impl EvalSummary {
    /// Percentage of conclusive rows that passed overall; `None` when
    /// no row produced a Pass or Fail verdict.
    pub fn pass_rate(&self) -> Option<f64> {
        let conclusive = self.overall_pass + self.overall_fail;
        (conclusive > 0).then(|| self.overall_pass as f64 / conclusive as f64 * 100.0)
    }
}

impl fmt::Display for EvalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} pass, {} fail, {} n/a",
            self.rows, self.overall_pass, self.overall_fail, self.overall_not_applicable
        )?;
        match self.pass_rate() {
            Some(rate) => writeln!(f, " ({:.1}% pass rate)", rate)?,
            None => writeln!(f)?,
        }
        for tally in &self.metrics {
            write!(
                f,
                "  {}: {} pass, {} fail, {} n/a, {} error",
                tally.name, tally.pass, tally.fail, tally.not_applicable, tally.error
            )?;
            match tally.mean_score {
                Some(mean) => writeln!(f, ", mean score {:.2} ({})", mean, tally.description)?,
                None => writeln!(f, " ({})", tally.description)?,
            }
        }
        Ok(())
    }
}

/// Tally verdicts and mean scores from an annotated table.
pub fn summarize(table: &EvalTable, metrics: &[Arc<dyn Metric>]) -> EvalSummary {
    let mut tallies = Vec::with_capacity(metrics.len());

    for metric in metrics {
        let verdict_column = format!("{}_verdict", metric.name());
        let score_column = format!("{}_score", metric.name());

        let mut tally = MetricTally {
            name: metric.name().to_string(),
            pass: 0,
            fail: 0,
            not_applicable: 0,
            error: 0,
            mean_score: None,
            description: String::new(),
        };
        let mut score_sum = 0.0;
        let mut score_count = 0usize;

        for record in table.records() {
            match record.cell(&verdict_column).map(Verdict::from_label) {
                Some(Verdict::Pass) => tally.pass += 1,
                Some(Verdict::Fail) => tally.fail += 1,
                Some(Verdict::Error) => tally.error += 1,
                Some(Verdict::NotApplicable) | None => tally.not_applicable += 1,
            }
            if let Some(value) = record
                .cell(&score_column)
                .and_then(|cell| cell.parse::<f64>().ok())
            {
                score_sum += value;
                score_count += 1;
            }
        }

        tally.mean_score = (score_count > 0).then(|| score_sum / score_count as f64);
        tally.description = match tally.mean_score {
            Some(mean) => metric.describe(MetricScore::Value(mean)),
            None => metric.describe(MetricScore::NotApplicable),
        };
        tallies.push(tally);
    }

    let mut summary = EvalSummary {
        rows: table.len(),
        overall_pass: 0,
        overall_fail: 0,
        overall_not_applicable: 0,
        metrics: tallies,
    };
    for record in table.records() {
        match record.cell(columns::OVERALL_VERDICT).map(Verdict::from_label) {
            Some(Verdict::Pass) => summary.overall_pass += 1,
            Some(Verdict::Fail) | Some(Verdict::Error) => summary.overall_fail += 1,
            Some(Verdict::NotApplicable) | None => summary.overall_not_applicable += 1,
        }
    }
    summary
}
