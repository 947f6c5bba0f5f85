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

//! Single-row evaluation.
//!
//! Runs each selected metric over one record, converts scores into
//! verdicts against the resolved thresholds, and reduces the verdicts
//! into one overall verdict. A metric that returns an error or panics
//! records `Error` for that metric; the row and the batch keep going.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::warn;
use verdex_core::{Criterion, MetricScore, TestRecord, Verdict};

use crate::thresholds::ThresholdResolver;
use crate::{EvalContext, Metric};

/// One metric's result for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricOutcome {
    /// Metric name, as registered.
    pub name: String,
    /// Computed score; `None` when the metric errored or panicked.
    pub score: Option<MetricScore>,
    /// Threshold verdict derived from the score.
    pub verdict: Verdict,
}

/// All metric outcomes for one record plus the reduced overall verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct RowResult {
    pub outcomes: Vec<MetricOutcome>,
    pub overall: Verdict,
}

/// Evaluates records one at a time against a fixed metric selection.
pub struct RowEvaluator<'a> {
    metrics: &'a [Arc<dyn Metric>],
    thresholds: &'a ThresholdResolver,
    criterion: Criterion,
}

impl<'a> RowEvaluator<'a> {
    pub fn new(
        metrics: &'a [Arc<dyn Metric>],
        thresholds: &'a ThresholdResolver,
        criterion: Criterion,
    ) -> Self {
        Self {
            metrics,
            thresholds,
            criterion,
        }
    }

    /// Evaluate one record with every selected metric, in order.
    pub fn evaluate(&self, record: &TestRecord, context: &EvalContext) -> RowResult {
        let outcomes: Vec<MetricOutcome> = self
            .metrics
            .iter()
            .map(|metric| self.run_metric(metric.as_ref(), record, context))
            .collect();

        let overall = reduce(self.criterion, outcomes.iter().map(|o| o.verdict));
        RowResult { outcomes, overall }
    }

    fn run_metric(
        &self,
        metric: &dyn Metric,
        record: &TestRecord,
        context: &EvalContext,
    ) -> MetricOutcome {
        let name = metric.name().to_string();

        match catch_unwind(AssertUnwindSafe(|| metric.compute(record, context))) {
            Ok(Ok(score)) => {
                let verdict = self.verdict_for(&name, score);
                MetricOutcome {
                    name,
                    score: Some(score),
                    verdict,
                }
            }
            Ok(Err(error)) => {
                warn!(
                    metric = %name,
                    record = %record.id,
                    %error,
                    "Metric failed, recording an Error verdict"
                );
                MetricOutcome {
                    name,
                    score: None,
                    verdict: Verdict::Error,
                }
            }
            Err(payload) => {
                warn!(
                    metric = %name,
                    record = %record.id,
                    panic = %panic_message(payload.as_ref()),
                    "Metric panicked, recording an Error verdict"
                );
                MetricOutcome {
                    name,
                    score: None,
                    verdict: Verdict::Error,
                }
            }
        }
    }

    fn verdict_for(&self, metric_name: &str, score: MetricScore) -> Verdict {
        match score {
            MetricScore::NotApplicable => Verdict::NotApplicable,
            MetricScore::Value(value) => {
                if value >= self.thresholds.resolve(metric_name) {
                    Verdict::Pass
                } else {
                    Verdict::Fail
                }
            }
        }
    }
}

/// Reduce per-metric verdicts into one overall verdict. `N/A` verdicts
/// carry no evidence and are dropped before the reduction; if nothing
/// remains the overall verdict is `N/A`.
pub fn reduce(criterion: Criterion, verdicts: impl IntoIterator<Item = Verdict>) -> Verdict {
    let gathered: Vec<Verdict> = verdicts
        .into_iter()
        .filter(|v| *v != Verdict::NotApplicable)
        .collect();

    if gathered.is_empty() {
        return Verdict::NotApplicable;
    }

    match criterion {
        Criterion::AllPass => {
            if gathered.iter().all(|v| *v == Verdict::Pass) {
                Verdict::Pass
            } else {
                Verdict::Fail
            }
        }
        Criterion::AnyPass => {
            if gathered.iter().any(|v| *v == Verdict::Pass) {
                Verdict::Pass
            } else if gathered.iter().any(|v| *v == Verdict::Fail) {
                Verdict::Fail
            } else {
                // Only Error verdicts: no conclusive evidence either way.
                Verdict::NotApplicable
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
