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

//! Answer similarity metric.
//!
//! Token-set F1 between the model output and the reference answer,
//! computed over normalized tokens so inflection differences do not
//! count against the score.

use std::collections::HashSet;

use verdex_core::{non_blank, MetricScore, TestRecord, VerdexError};

use crate::{EvalContext, Metric};

/// Scores output/reference overlap as a balanced F1.
pub struct AnswerSimilarity;

impl AnswerSimilarity {
    pub fn new() -> Self {
        Self
    }

    fn f1(output_tokens: &HashSet<String>, reference_tokens: &HashSet<String>) -> f64 {
        let intersection = output_tokens.intersection(reference_tokens).count();

        let precision = intersection as f64 / output_tokens.len() as f64;
        let recall = intersection as f64 / reference_tokens.len() as f64;

        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * (precision * recall) / (precision + recall)
        }
    }
}

impl Default for AnswerSimilarity {
    fn default() -> Self {
        Self::new()
    }
}

impl Metric for AnswerSimilarity {
    fn name(&self) -> &str {
        "answer_similarity"
    }

    fn compute(
        &self,
        record: &TestRecord,
        context: &EvalContext,
    ) -> Result<MetricScore, VerdexError> {
        let reference = match non_blank(record.reference_answer.as_deref()) {
            Some(reference) => reference,
            None => return Ok(MetricScore::NotApplicable),
        };

        let reference_tokens: HashSet<String> =
            context.normalizer.normalize(reference).into_iter().collect();
        if reference_tokens.is_empty() {
            // A reference with no usable tokens gives nothing to compare
            // against, same as no reference at all.
            return Ok(MetricScore::NotApplicable);
        }

        let output = match record.output_text() {
            Some(output) => output,
            None => return Ok(MetricScore::Value(0.0)),
        };

        let output_tokens: HashSet<String> =
            context.normalizer.normalize(output).into_iter().collect();
        if output_tokens.is_empty() {
            return Ok(MetricScore::Value(0.0));
        }

        Ok(MetricScore::Value(Self::f1(
            &output_tokens,
            &reference_tokens,
        )))
    }
}
