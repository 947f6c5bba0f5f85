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

//! Answer relevancy metric.
//!
//! Measures how much of the query the output actually addresses: the
//! fraction of the query's normalized tokens that appear in the
//! output's normalized token set.

use std::collections::HashSet;

use verdex_core::{non_blank, MetricScore, TestRecord, VerdexError};

use crate::{EvalContext, Metric};

/// Scores query-token coverage of the output.
pub struct AnswerRelevancy;

impl AnswerRelevancy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnswerRelevancy {
    fn default() -> Self {
        Self::new()
    }
}

impl Metric for AnswerRelevancy {
    fn name(&self) -> &str {
        "answer_relevancy"
    }

    fn compute(
        &self,
        record: &TestRecord,
        context: &EvalContext,
    ) -> Result<MetricScore, VerdexError> {
        let query = match non_blank(Some(record.query.as_str())) {
            Some(query) => query,
            None => return Ok(MetricScore::NotApplicable),
        };

        let query_tokens: HashSet<String> =
            context.normalizer.normalize(query).into_iter().collect();
        if query_tokens.is_empty() {
            return Ok(MetricScore::NotApplicable);
        }

        let output = match record.output_text() {
            Some(output) => output,
            None => return Ok(MetricScore::Value(0.0)),
        };

        let output_tokens: HashSet<String> =
            context.normalizer.normalize(output).into_iter().collect();

        let covered = query_tokens
            .iter()
            .filter(|token| output_tokens.contains(*token))
            .count();

        Ok(MetricScore::Value(covered as f64 / query_tokens.len() as f64))
    }
}
