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

//! Dataset loading for CSV and JSON sources.
//!
//! The loader hands the engine a table with guaranteed shape: column
//! names are canonicalized, every recognized column exists (materialized
//! empty when the file lacks it), `id` is string-typed, reviewer
//! verdicts are standardized to `{Pass, Fail, N/A, Error}`, and the
//! `query` column holds at least one non-blank value.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, VerdexError};
use crate::types::{canonical_name, columns, non_blank, EvalTable, TestRecord};

/// Load a dataset from a `.csv` or `.json` file.
pub fn load_path(path: impl AsRef<Path>) -> Result<EvalTable> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let table = match extension.as_str() {
        "csv" => from_csv_reader(File::open(path)?)?,
        "json" => {
            let mut data = String::new();
            File::open(path)?.read_to_string(&mut data)?;
            from_json_str(&data)?
        }
        _ => return Err(VerdexError::UnsupportedFormat(path.display().to_string())),
    };

    debug!(
        rows = table.len(),
        columns = table.columns().len(),
        "loaded dataset from {}",
        path.display()
    );
    Ok(table)
}

/// Parse CSV data with a header row.
pub fn from_csv_reader<R: Read>(reader: R) -> Result<EvalTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = normalize_headers(csv_reader.headers()?.iter())?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let mut record = TestRecord::default();
        for (i, column) in headers.iter().enumerate() {
            // Short rows are tolerated; missing cells stay unset.
            if let Some(value) = row.get(i) {
                record.set_cell(column, value);
            }
        }
        records.push(record);
    }

    finalize(headers, records)
}

/// Parse a JSON document holding a top-level array of flat objects.
pub fn from_json_str(data: &str) -> Result<EvalTable> {
    let value: serde_json::Value = serde_json::from_str(data)?;
    let rows = value.as_array().ok_or_else(|| {
        VerdexError::MalformedInput("expected a top-level JSON array of objects".to_string())
    })?;

    let mut headers: Vec<String> = Vec::new();
    let mut records = Vec::new();
    for row in rows {
        let object = row.as_object().ok_or_else(|| {
            VerdexError::MalformedInput("expected every JSON row to be an object".to_string())
        })?;

        let mut record = TestRecord::default();
        for (key, cell) in object {
            let column = canonical_name(key);
            if column.is_empty() {
                continue;
            }
            if !headers.contains(&column) {
                headers.push(column.clone());
            }
            if let Some(text) = json_cell_text(cell) {
                record.set_cell(&column, &text);
            }
        }
        records.push(record);
    }

    finalize(headers, records)
}

/// Canonicalize header names, rejecting collisions such as a file with
/// both `Query` and `query` columns.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Result<Vec<String>> {
    let mut headers = Vec::new();
    for name in raw {
        let column = canonical_name(name);
        if column.is_empty() {
            return Err(VerdexError::MalformedInput(
                "dataset has an unnamed column".to_string(),
            ));
        }
        if headers.contains(&column) {
            return Err(VerdexError::MalformedInput(format!(
                "columns collide after normalization: '{}'",
                column
            )));
        }
        headers.push(column);
    }
    Ok(headers)
}

fn json_cell_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        // Nested structures are carried as their JSON text.
        other => Some(other.to_string()),
    }
}

/// Materialize missing recognized columns and enforce the structural
/// gate: `query` must exist with at least one non-blank value.
fn finalize(mut headers: Vec<String>, records: Vec<TestRecord>) -> Result<EvalTable> {
    for column in columns::RECOGNIZED {
        if !headers.iter().any(|h| h == column) {
            headers.push(column.to_string());
        }
    }

    let any_query = records
        .iter()
        .any(|r| non_blank(Some(r.query.as_str())).is_some());
    if !any_query {
        return Err(VerdexError::MissingColumn(columns::QUERY.to_string()));
    }

    Ok(EvalTable::new(headers, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;
    use std::io::Write;

    #[test]
    fn test_csv_basic() {
        let data = "\
id,query,llm_output,required_facts
1,capital of France?,Paris is the capital.,Paris
2,refund window?,We do not offer refunds.,refund; 30 days
";
        let table = from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, columns::ID), Some("1"));
        assert_eq!(table.cell(1, columns::REQUIRED_FACTS), Some("refund; 30 days"));
        // Recognized columns the file lacked are materialized.
        assert!(table.has_column(columns::REFERENCE_ANSWER));
        assert!(table.has_column(columns::REVIEWER_VERDICT));
    }

    #[test]
    fn test_csv_header_normalization() {
        let data = "\
ID,Query,LLM Output,Reference-Answer,Initial Reviewer Verdict
a,why?,because,explanation,pAsS
";
        let table = from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.cell(0, columns::LLM_OUTPUT), Some("because"));
        assert_eq!(table.cell(0, columns::REFERENCE_ANSWER), Some("explanation"));
        assert_eq!(
            table.records()[0].initial_reviewer_verdict,
            Verdict::Pass
        );
    }

    #[test]
    fn test_csv_unknown_verdict_standardized() {
        let data = "id,query,initial_reviewer_verdict\n1,q,maybe\n2,q,\n";
        let table = from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(
            table.records()[0].initial_reviewer_verdict,
            Verdict::NotApplicable
        );
        assert_eq!(
            table.records()[1].initial_reviewer_verdict,
            Verdict::NotApplicable
        );
    }

    #[test]
    fn test_csv_extra_columns_survive() {
        let data = "id,query,reviewer_notes\n1,q,double-checked\n";
        let table = from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.cell(0, "reviewer_notes"), Some("double-checked"));
        assert!(table.has_column("reviewer_notes"));
    }

    #[test]
    fn test_csv_short_rows_tolerated() {
        let data = "id,query,llm_output\n1,q\n";
        let table = from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.cell(0, columns::LLM_OUTPUT), None);
    }

    #[test]
    fn test_missing_query_column() {
        let data = "id,llm_output\n1,hello\n";
        let err = from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, VerdexError::MissingColumn(_)));
    }

    #[test]
    fn test_query_all_blank() {
        let data = "id,query\n1,\n2,   \n";
        let err = from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, VerdexError::MissingColumn(_)));
    }

    #[test]
    fn test_colliding_headers() {
        let data = "Query,query\nq1,q2\n";
        let err = from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, VerdexError::MalformedInput(_)));
    }

    #[test]
    fn test_json_basic() {
        let data = r#"[
            {"id": 1, "query": "capital?", "llm_output": "Paris", "score_hint": 0.9},
            {"id": 2, "query": "refund?", "llm_output": null}
        ]"#;
        let table = from_json_str(data).unwrap();
        assert_eq!(table.len(), 2);
        // Numeric ids become strings.
        assert_eq!(table.cell(0, columns::ID), Some("1"));
        assert_eq!(table.cell(0, "score_hint"), Some("0.9"));
        assert_eq!(table.cell(1, columns::LLM_OUTPUT), None);
    }

    #[test]
    fn test_json_not_an_array() {
        let err = from_json_str(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, VerdexError::MalformedInput(_)));
    }

    #[test]
    fn test_load_path_unsupported_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .unwrap();
        writeln!(file, "not a table").unwrap();
        let err = load_path(file.path()).unwrap_err();
        assert!(matches!(err, VerdexError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_path_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,query").unwrap();
        writeln!(file, "1,why?").unwrap();
        let table = load_path(file.path()).unwrap();
        assert_eq!(table.len(), 1);
    }
}
