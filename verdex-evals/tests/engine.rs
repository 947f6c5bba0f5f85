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

//! End-to-end tests over the whole engine: load a table, evaluate it,
//! summarize it, score reviewer agreement and round-trip the export.

use std::collections::HashMap;

use verdex_core::{from_csv_reader, to_csv_string, Criterion, EvalTable, TestRecord};
use verdex_evals::{agreement, summarize, DatasetEvaluator, MetricRegistry};

const SAMPLE_CSV: &str = "\
id,query,llm_output,required_facts,initial_reviewer_verdict
1,What is the capital of France?,The capital is Paris and the cost was $500.,Paris; 500 dollars,
2,What is the refund policy?,We do not offer refunds.,refund; 30 days,Pass
3,What is the refund policy?,We do not offer refunds.,refund; 30 days,Fail
";

fn fact_selection() -> Vec<String> {
    vec!["fact_adherence".to_string()]
}

/// Lemmatized, number-aware matching: both scenario rows score the way
/// a human reading them would expect.
#[test]
fn test_fact_adherence_scenarios_end_to_end() {
    let table = from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
    let annotated = DatasetEvaluator::new()
        .evaluate(&table, &fact_selection())
        .unwrap();

    // "Paris" and "500 dollars" both found despite $-notation.
    assert_eq!(annotated.cell(0, "fact_adherence_score"), Some("1"));
    assert_eq!(annotated.cell(0, "overall_verdict"), Some("Pass"));

    // "refund" found (lemmatized from "refunds"), "30 days" absent.
    assert_eq!(annotated.cell(1, "fact_adherence_score"), Some("0.5"));
    assert_eq!(annotated.cell(1, "overall_verdict"), Some("Fail"));
}

/// A reviewer's Pass stands over the automated Fail, and the same row
/// counts as a mismatch in the agreement report.
#[test]
fn test_reviewer_override_and_agreement() {
    let table = from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
    let annotated = DatasetEvaluator::new()
        .evaluate(&table, &fact_selection())
        .unwrap();

    // Row 2: automated Fail, reviewer Pass; the reviewer wins.
    assert_eq!(annotated.cell(1, "overall_verdict"), Some("Fail"));
    assert_eq!(annotated.cell(1, "reviewer_final_verdict"), Some("Pass"));
    // Row 1 has no reviewer verdict and falls back to the automated one.
    assert_eq!(annotated.cell(0, "reviewer_final_verdict"), Some("Pass"));

    let report = agreement(&annotated, "initial_reviewer_verdict", "overall_verdict").unwrap();
    // Rows 2 and 3 are comparable; only row 3 agrees.
    assert_eq!(report.comparable, 2);
    assert_eq!(report.matched, 1);
    assert_eq!(report.percentage, 50.0);
}

#[test]
fn test_threshold_override_flips_a_verdict() {
    let table = from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();

    let relaxed = DatasetEvaluator::new()
        .with_thresholds(HashMap::from([("fact_adherence".to_string(), 0.5)]))
        .evaluate(&table, &fact_selection())
        .unwrap();

    // 0.5 now meets the cut line.
    assert_eq!(relaxed.cell(1, "fact_adherence_verdict"), Some("Pass"));
    assert_eq!(relaxed.cell(1, "overall_verdict"), Some("Pass"));
}

#[test]
fn test_safety_threshold_stays_pinned_under_override() {
    let table = EvalTable::from_records(vec![TestRecord::new("1", "q")
        .with_llm_output("A breach was reported yesterday.")]);

    let annotated = DatasetEvaluator::new()
        .with_sensitive_keywords(vec!["breach".to_string()])
        .with_thresholds(HashMap::from([("safety".to_string(), 0.5)]))
        .evaluate(&table, &["safety".to_string()])
        .unwrap();

    // Score 0.75 would clear a 0.5 threshold, but safety is pinned at 1.0.
    assert_eq!(annotated.cell(0, "safety_score"), Some("0.75"));
    assert_eq!(annotated.cell(0, "safety_verdict"), Some("Fail"));
}

#[test]
fn test_criterion_changes_the_overall_verdict() {
    let record = TestRecord::new("1", "q")
        .with_llm_output("The capital is Paris and the cost was $500.")
        .with_required_facts("Paris; 500 dollars")
        .with_reference_answer("Trains depart hourly from the station.");
    let table = EvalTable::from_records(vec![record]);
    let selection = vec![
        "fact_adherence".to_string(),
        "answer_similarity".to_string(),
    ];

    let strict = DatasetEvaluator::new()
        .with_criterion(Criterion::AllPass)
        .evaluate(&table, &selection)
        .unwrap();
    assert_eq!(strict.cell(0, "fact_adherence_verdict"), Some("Pass"));
    assert_eq!(strict.cell(0, "answer_similarity_verdict"), Some("Fail"));
    assert_eq!(strict.cell(0, "overall_verdict"), Some("Fail"));

    let lenient = DatasetEvaluator::new()
        .with_criterion(Criterion::AnyPass)
        .evaluate(&table, &selection)
        .unwrap();
    assert_eq!(lenient.cell(0, "overall_verdict"), Some("Pass"));
}

#[test]
fn test_row_with_no_applicable_metric_gets_overall_not_applicable() {
    let table = EvalTable::from_records(vec![
        TestRecord::new("1", "q").with_llm_output("Some answer.")
    ]);
    let selection = vec![
        "fact_adherence".to_string(),
        "answer_similarity".to_string(),
    ];

    let annotated = DatasetEvaluator::new().evaluate(&table, &selection).unwrap();

    assert_eq!(annotated.cell(0, "fact_adherence_verdict"), Some("N/A"));
    assert_eq!(annotated.cell(0, "answer_similarity_verdict"), Some("N/A"));
    assert_eq!(annotated.cell(0, "overall_verdict"), Some("N/A"));
    assert_eq!(annotated.cell(0, "reviewer_final_verdict"), Some("N/A"));
}

#[test]
fn test_agreement_is_none_when_nothing_is_comparable() {
    let table = EvalTable::from_records(vec![
        TestRecord::new("1", "q").with_llm_output("Some answer.")
    ]);
    let annotated = DatasetEvaluator::new()
        .evaluate(&table, &fact_selection())
        .unwrap();

    assert_eq!(
        agreement(&annotated, "initial_reviewer_verdict", "overall_verdict"),
        None
    );
}

/// Exported results load back with the same columns, rows and cells.
#[test]
fn test_export_round_trips_through_the_loader() {
    let table = from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
    let annotated = DatasetEvaluator::new()
        .evaluate(&table, &fact_selection())
        .unwrap();

    let exported = to_csv_string(&annotated).unwrap();
    let reloaded = from_csv_reader(exported.as_bytes()).unwrap();

    assert_eq!(reloaded.columns(), annotated.columns());
    assert_eq!(reloaded.len(), annotated.len());
    assert_eq!(
        reloaded.cell(0, "fact_adherence_score"),
        annotated.cell(0, "fact_adherence_score")
    );
    assert_eq!(
        reloaded.cell(2, "reviewer_final_verdict"),
        annotated.cell(2, "reviewer_final_verdict")
    );
}

#[test]
fn test_summary_over_a_mixed_run() {
    let table = from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
    let annotated = DatasetEvaluator::new()
        .evaluate(&table, &fact_selection())
        .unwrap();

    let metrics = MetricRegistry::with_builtins().select(&fact_selection()).unwrap();
    let summary = summarize(&annotated, &metrics);

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.overall_pass, 1);
    assert_eq!(summary.overall_fail, 2);
    assert_eq!(summary.metrics[0].pass, 1);
    assert_eq!(summary.metrics[0].fail, 2);
    assert_eq!(summary.metrics[0].error, 0);
}
