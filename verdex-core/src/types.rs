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

//! Core data model: test records, tables, scores, verdicts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::VerdexError;

/// Canonical column names the engine understands. The loader maps any
/// casing/spacing variant of these onto the canonical form.
pub mod columns {
    pub const ID: &str = "id";
    pub const QUERY: &str = "query";
    pub const LLM_OUTPUT: &str = "llm_output";
    pub const REFERENCE_ANSWER: &str = "reference_answer";
    pub const REQUIRED_FACTS: &str = "required_facts";
    pub const REVIEWER_VERDICT: &str = "initial_reviewer_verdict";

    /// All recognized input columns, in canonical order.
    pub const RECOGNIZED: [&str; 6] = [
        ID,
        QUERY,
        LLM_OUTPUT,
        REFERENCE_ANSWER,
        REQUIRED_FACTS,
        REVIEWER_VERDICT,
    ];

    /// Result columns appended by the dataset evaluator.
    pub const OVERALL_VERDICT: &str = "overall_verdict";
    pub const REVIEWER_FINAL_VERDICT: &str = "reviewer_final_verdict";
}

/// Lower-cases a column or metric name and maps spaces and hyphens to
/// underscores, so `"Fact Adherence"`, `"fact-adherence"` and
/// `"fact_adherence"` all address the same thing.
pub fn canonical_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Returns the trimmed text when it holds any non-whitespace character.
///
/// Missing and whitespace-only values are equivalent everywhere in the
/// engine; this is the one place that rule lives.
pub fn non_blank(text: Option<&str>) -> Option<&str> {
    let trimmed = text?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Pass/fail classification of a score, or of a whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
    #[default]
    #[serde(rename = "N/A")]
    NotApplicable,
    /// A metric invocation failed unexpectedly.
    Error,
}

impl Verdict {
    /// Display form, also used as the table cell value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "Pass",
            Verdict::Fail => "Fail",
            Verdict::NotApplicable => "N/A",
            Verdict::Error => "Error",
        }
    }

    /// Standardizes a raw label as the loader does: case-insensitive,
    /// trimmed, and anything unrecognized (including blank) is `N/A`.
    pub fn from_label(raw: &str) -> Verdict {
        match raw.trim().to_lowercase().as_str() {
            "pass" => Verdict::Pass,
            "fail" => Verdict::Fail,
            "error" => Verdict::Error,
            _ => Verdict::NotApplicable,
        }
    }

    /// True for the two verdicts that carry pass/fail evidence.
    pub fn is_conclusive(&self) -> bool {
        matches!(self, Verdict::Pass | Verdict::Fail)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a metric produced for one row: a real score in `[0, 1]`, or
/// nothing to evaluate.
///
/// `NotApplicable` is reserved for a missing auxiliary input (no
/// required facts, no reference answer, no keyword list). Zero matches
/// is a real `Value(0.0)`, never `NotApplicable`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricScore {
    Value(f64),
    NotApplicable,
}

impl MetricScore {
    /// The numeric score, when there is one.
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricScore::Value(v) => Some(*v),
            MetricScore::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, MetricScore::Value(_))
    }
}

impl fmt::Display for MetricScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricScore::Value(v) => write!(f, "{}", v),
            MetricScore::NotApplicable => f.write_str("N/A"),
        }
    }
}

/// How per-metric verdicts reduce to one overall verdict per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Criterion {
    /// Every conclusive metric must pass.
    #[default]
    AllPass,
    /// One passing metric is enough.
    AnyPass,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::AllPass => "all-pass",
            Criterion::AnyPass => "any-pass",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = VerdexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_name(s).as_str() {
            "all_pass" | "allpass" | "all" => Ok(Criterion::AllPass),
            "any_pass" | "anypass" | "any" => Ok(Criterion::AnyPass),
            _ => Err(VerdexError::InvalidCriterion(s.to_string())),
        }
    }
}

/// One test case: a query, the generated answer under evaluation, and
/// the human-authored expectations to score it against.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestRecord {
    /// Stable identifier, always string-typed.
    pub id: String,

    /// The prompt/question posed to the model.
    pub query: String,

    /// The generated answer being scored.
    pub llm_output: Option<String>,

    /// Expected answer text, when available.
    pub reference_answer: Option<String>,

    /// `;`-delimited fact phrases the output must contain.
    pub required_facts: Option<String>,

    /// Human reviewer's verdict from the source file, standardized.
    #[serde(default)]
    pub initial_reviewer_verdict: Verdict,

    /// Unrecognized source columns and appended result columns, carried
    /// through unchanged.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl TestRecord {
    /// Create a record with just an id and a query.
    pub fn new(id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
            llm_output: None,
            reference_answer: None,
            required_facts: None,
            initial_reviewer_verdict: Verdict::NotApplicable,
            extra: BTreeMap::new(),
        }
    }

    /// Set the generated answer.
    pub fn with_llm_output(mut self, output: impl Into<String>) -> Self {
        self.llm_output = Some(output.into());
        self
    }

    /// Set the expected answer.
    pub fn with_reference_answer(mut self, answer: impl Into<String>) -> Self {
        self.reference_answer = Some(answer.into());
        self
    }

    /// Set the `;`-delimited required facts.
    pub fn with_required_facts(mut self, facts: impl Into<String>) -> Self {
        self.required_facts = Some(facts.into());
        self
    }

    /// Set the reviewer's verdict.
    pub fn with_reviewer_verdict(mut self, verdict: Verdict) -> Self {
        self.initial_reviewer_verdict = verdict;
        self
    }

    /// Cell value for a canonical column name. Recognized names resolve
    /// to the typed fields, anything else to `extra`.
    pub fn cell(&self, column: &str) -> Option<&str> {
        match column {
            columns::ID => Some(self.id.as_str()),
            columns::QUERY => Some(self.query.as_str()),
            columns::LLM_OUTPUT => self.llm_output.as_deref(),
            columns::REFERENCE_ANSWER => self.reference_answer.as_deref(),
            columns::REQUIRED_FACTS => self.required_facts.as_deref(),
            columns::REVIEWER_VERDICT => Some(self.initial_reviewer_verdict.as_str()),
            _ => self.extra.get(column).map(String::as_str),
        }
    }

    /// Store a cell value under a canonical column name. Blank values
    /// leave the optional fields unset; the reviewer verdict is
    /// standardized on the way in.
    pub fn set_cell(&mut self, column: &str, value: &str) {
        match column {
            columns::ID => self.id = value.to_string(),
            columns::QUERY => self.query = value.to_string(),
            columns::LLM_OUTPUT => {
                self.llm_output = non_blank(Some(value)).map(|_| value.to_string());
            }
            columns::REFERENCE_ANSWER => {
                self.reference_answer = non_blank(Some(value)).map(|_| value.to_string());
            }
            columns::REQUIRED_FACTS => {
                self.required_facts = non_blank(Some(value)).map(|_| value.to_string());
            }
            columns::REVIEWER_VERDICT => {
                self.initial_reviewer_verdict = Verdict::from_label(value);
            }
            _ => {
                self.extra.insert(column.to_string(), value.to_string());
            }
        }
    }

    /// The generated answer, if it holds any non-whitespace text.
    pub fn output_text(&self) -> Option<&str> {
        non_blank(self.llm_output.as_deref())
    }
}

/// A dataset: ordered records plus the ordered column list of the
/// source file. The engine never mutates a table in place; evaluation
/// returns a freshly annotated copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EvalTable {
    columns: Vec<String>,
    records: Vec<TestRecord>,
}

impl EvalTable {
    pub fn new(columns: Vec<String>, records: Vec<TestRecord>) -> Self {
        Self { columns, records }
    }

    /// Build a table from records alone, with the canonical columns.
    pub fn from_records(records: Vec<TestRecord>) -> Self {
        Self {
            columns: columns::RECOGNIZED.iter().map(|c| c.to_string()).collect(),
            records,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [TestRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Append a column to the layout unless it is already present.
    pub fn push_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_column(&name) {
            self.columns.push(name);
        }
    }

    /// Cell value at a row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        self.records.get(row).and_then(|r| r.cell(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::Pass.as_str(), "Pass");
        assert_eq!(Verdict::NotApplicable.as_str(), "N/A");
        assert_eq!(Verdict::from_label("PASS"), Verdict::Pass);
        assert_eq!(Verdict::from_label("  fail "), Verdict::Fail);
        assert_eq!(Verdict::from_label("error"), Verdict::Error);
        assert_eq!(Verdict::from_label("n/a"), Verdict::NotApplicable);
        // Unrecognized and blank both standardize to N/A.
        assert_eq!(Verdict::from_label("maybe"), Verdict::NotApplicable);
        assert_eq!(Verdict::from_label(""), Verdict::NotApplicable);
    }

    #[test]
    fn test_default_record_has_no_reviewer_verdict() {
        // The loader builds records from TestRecord::default(); a row
        // without a reviewer cell must come out as N/A.
        assert_eq!(Verdict::default(), Verdict::NotApplicable);

        let record = TestRecord::default();
        assert_eq!(record.initial_reviewer_verdict, Verdict::NotApplicable);
        assert_eq!(record.cell(columns::REVIEWER_VERDICT), Some("N/A"));

        let parsed: TestRecord = serde_json::from_str(r#"{"id": "1", "query": "q"}"#).unwrap();
        assert_eq!(parsed.initial_reviewer_verdict, Verdict::NotApplicable);
    }

    #[test]
    fn test_criterion_parsing() {
        assert_eq!("all-pass".parse::<Criterion>().unwrap(), Criterion::AllPass);
        assert_eq!("Any Pass".parse::<Criterion>().unwrap(), Criterion::AnyPass);
        assert_eq!("ALL".parse::<Criterion>().unwrap(), Criterion::AllPass);
        assert!("most-pass".parse::<Criterion>().is_err());
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("Fact Adherence"), "fact_adherence");
        assert_eq!(canonical_name("LLM-Output"), "llm_output");
        assert_eq!(canonical_name("  query  "), "query");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  hi  ")), Some("hi"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_metric_score_display() {
        assert_eq!(MetricScore::Value(0.5).to_string(), "0.5");
        assert_eq!(MetricScore::NotApplicable.to_string(), "N/A");
        assert_eq!(MetricScore::Value(0.5).value(), Some(0.5));
        assert_eq!(MetricScore::NotApplicable.value(), None);
    }

    #[test]
    fn test_record_cells() {
        let mut record = TestRecord::new("7", "What is the capital of France?")
            .with_llm_output("Paris.")
            .with_reviewer_verdict(Verdict::Pass);
        record.set_cell("notes", "checked by hand");

        assert_eq!(record.cell(columns::ID), Some("7"));
        assert_eq!(record.cell(columns::LLM_OUTPUT), Some("Paris."));
        assert_eq!(record.cell(columns::REVIEWER_VERDICT), Some("Pass"));
        assert_eq!(record.cell(columns::REQUIRED_FACTS), None);
        assert_eq!(record.cell("notes"), Some("checked by hand"));
        assert_eq!(record.cell("absent"), None);
    }

    #[test]
    fn test_set_cell_blank_stays_unset() {
        let mut record = TestRecord::new("1", "q");
        record.set_cell(columns::REFERENCE_ANSWER, "   ");
        assert_eq!(record.reference_answer, None);
        record.set_cell(columns::REVIEWER_VERDICT, "unknown");
        assert_eq!(record.initial_reviewer_verdict, Verdict::NotApplicable);
    }

    #[test]
    fn test_table_push_column_dedup() {
        let mut table = EvalTable::from_records(vec![TestRecord::new("1", "q")]);
        let before = table.columns().len();
        table.push_column("overall_verdict");
        table.push_column("overall_verdict");
        assert_eq!(table.columns().len(), before + 1);
    }
}
