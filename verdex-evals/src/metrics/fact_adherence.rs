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

//! Fact adherence metric.
//!
//! Checks that each required fact phrase appears in the model output,
//! comparing *normalized* token sets so "500 dollars" still matches
//! "the cost was $500" and "refunds issued" matches "refund is issued".
//! The score is the fraction of fact phrases found.

use std::collections::HashSet;

use verdex_core::{non_blank, MetricScore, TestRecord, VerdexError};

use crate::{EvalContext, Metric};

/// Scores how many semicolon-separated fact phrases the output contains.
pub struct FactAdherence;

impl FactAdherence {
    pub fn new() -> Self {
        Self
    }

    /// Split the raw fact column into trimmed, non-empty phrases.
    fn split_facts(raw: &str) -> Vec<&str> {
        raw.split(';')
            .map(str::trim)
            .filter(|fact| !fact.is_empty())
            .collect()
    }

    /// A fact counts as present when every one of its normalized tokens
    /// occurs somewhere in the output's normalized token set.
    fn fact_is_present(
        fact: &str,
        output_tokens: &HashSet<String>,
        context: &EvalContext,
    ) -> bool {
        let fact_tokens = context.normalizer.normalize(fact);
        // Phrases that normalize to nothing are never matched, but they
        // still count toward the denominator.
        !fact_tokens.is_empty()
            && fact_tokens
                .iter()
                .all(|token| output_tokens.contains(token))
    }
}

impl Default for FactAdherence {
    fn default() -> Self {
        Self::new()
    }
}

impl Metric for FactAdherence {
    fn name(&self) -> &str {
        "fact_adherence"
    }

    fn compute(
        &self,
        record: &TestRecord,
        context: &EvalContext,
    ) -> Result<MetricScore, VerdexError> {
        let raw_facts = match non_blank(record.required_facts.as_deref()) {
            Some(raw) => raw,
            None => return Ok(MetricScore::NotApplicable),
        };

        let facts = Self::split_facts(raw_facts);
        if facts.is_empty() {
            return Ok(MetricScore::NotApplicable);
        }

        let output = match record.output_text() {
            Some(output) => output,
            None => return Ok(MetricScore::Value(0.0)),
        };

        let matched = if context.normalizer.is_ready() {
            let output_tokens: HashSet<String> =
                context.normalizer.normalize(output).into_iter().collect();
            facts
                .iter()
                .filter(|fact| Self::fact_is_present(fact, &output_tokens, context))
                .count()
        } else {
            // Degraded matching: plain case-insensitive substring search.
            let lowered = output.to_lowercase();
            facts
                .iter()
                .filter(|fact| lowered.contains(&fact.to_lowercase()))
                .count()
        };

        Ok(MetricScore::Value(matched as f64 / facts.len() as f64))
    }

    fn describe(&self, score: MetricScore) -> String {
        let band = match score {
            MetricScore::NotApplicable => "no facts provided",
            MetricScore::Value(v) if v >= 1.0 => "all facts found",
            MetricScore::Value(v) if v >= 0.75 => "most facts found",
            MetricScore::Value(v) if v >= 0.5 => "some facts found",
            MetricScore::Value(v) if v > 0.0 => "few facts found",
            MetricScore::Value(_) => "no facts found",
        };
        band.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(output: Option<&str>, facts: Option<&str>) -> TestRecord {
        let mut r = TestRecord::new("1", "What is the capital of France?");
        if let Some(output) = output {
            r = r.with_llm_output(output);
        }
        if let Some(facts) = facts {
            r = r.with_required_facts(facts);
        }
        r
    }

    fn score(output: Option<&str>, facts: Option<&str>) -> MetricScore {
        FactAdherence::new()
            .compute(&record(output, facts), &EvalContext::new())
            .unwrap()
    }

    #[test]
    fn test_missing_facts_is_not_applicable() {
        assert_eq!(score(Some("Paris."), None), MetricScore::NotApplicable);
        assert_eq!(score(Some("Paris."), Some("   ")), MetricScore::NotApplicable);
    }

    #[test]
    fn test_facts_of_only_separators_is_not_applicable() {
        assert_eq!(score(Some("Paris."), Some(" ; ;; ")), MetricScore::NotApplicable);
    }

    #[test]
    fn test_blank_output_with_facts_scores_zero() {
        assert_eq!(score(None, Some("Paris")), MetricScore::Value(0.0));
        assert_eq!(score(Some("  "), Some("Paris")), MetricScore::Value(0.0));
    }

    #[test]
    fn test_currency_and_inflection_both_match() {
        assert_eq!(
            score(
                Some("The capital is Paris and the cost was $500."),
                Some("Paris; 500 dollars")
            ),
            MetricScore::Value(1.0)
        );
    }

    #[test]
    fn test_partial_match_scores_half() {
        assert_eq!(
            score(Some("We do not offer refunds."), Some("refund; 30 days")),
            MetricScore::Value(0.5)
        );
    }

    #[test]
    fn test_word_order_inside_a_fact_is_ignored() {
        assert_eq!(
            score(
                Some("Invoices are due within 30 days of issue."),
                Some("30 days; due invoices")
            ),
            MetricScore::Value(1.0)
        );
    }

    #[test]
    fn test_unmatchable_phrase_still_counts_in_denominator() {
        // "!!!" normalizes to zero tokens, so it can never match, but
        // it keeps its share of the denominator.
        assert_eq!(
            score(Some("The capital is Paris."), Some("Paris; !!!")),
            MetricScore::Value(0.5)
        );
    }

    #[test]
    fn test_degraded_mode_uses_substring_matching() {
        let context = EvalContext::new().with_normalizer(crate::Normalizer::degraded());
        let metric = FactAdherence::new();

        // Exact (case-insensitive) substring hits.
        let hit = metric
            .compute(
                &record(Some("Refunds are issued in 30 days."), Some("refunds; 30 days")),
                &context,
            )
            .unwrap();
        assert_eq!(hit, MetricScore::Value(1.0));

        // No lemmatization, so a singular fact misses the plural form.
        let miss = metric
            .compute(&record(Some("Refunds are issued."), Some("refund is issued")), &context)
            .unwrap();
        assert_eq!(miss, MetricScore::Value(0.0));
    }

    #[test]
    fn test_describe_bands() {
        let metric = FactAdherence::new();
        assert_eq!(metric.describe(MetricScore::NotApplicable), "no facts provided");
        assert_eq!(metric.describe(MetricScore::Value(1.0)), "all facts found");
        assert_eq!(metric.describe(MetricScore::Value(0.8)), "most facts found");
        assert_eq!(metric.describe(MetricScore::Value(0.5)), "some facts found");
        assert_eq!(metric.describe(MetricScore::Value(0.25)), "few facts found");
        assert_eq!(metric.describe(MetricScore::Value(0.0)), "no facts found");
    }

    proptest! {
        /// Adding a fact phrase taken verbatim from the output can never
        /// lower the score.
        #[test]
        fn prop_adding_present_fact_never_lowers_score(
            words in proptest::collection::vec("[a-z]{2,8}", 2..6),
            absent in "[a-z]{9,12}",
        ) {
            let output = words.join(" ");
            let present = words[0].clone();

            let base = score(Some(&output), Some(&absent));
            let extended = score(Some(&output), Some(&format!("{}; {}", absent, present)));

            let base_value = base.value().unwrap();
            let extended_value = extended.value().unwrap();
            prop_assert!(extended_value >= base_value);
        }

        /// Scores always land in [0, 1].
        #[test]
        fn prop_score_is_bounded(
            output in "[ -~]{0,80}",
            facts in "[ -~]{1,40}",
        ) {
            if let MetricScore::Value(v) = score(Some(&output), Some(&facts)) {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
