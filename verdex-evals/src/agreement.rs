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

//! Reviewer-vs-automated agreement.
//!
//! Compares two verdict columns over the rows where both sides reached
//! a conclusive `Pass` or `Fail`. Rows with `N/A`, `Error`, missing
//! cells or unparseable labels are left out of the comparison; with no
//! comparable rows at all there is no percentage to report.

use std::fmt;

use serde::Serialize;
use verdex_core::{EvalTable, Verdict};

/// Agreement between two verdict columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgreementReport {
    /// Percentage of comparable rows where the verdicts matched.
    pub percentage: f64,
    /// Comparable rows with matching verdicts.
    pub matched: usize,
    /// Rows where both columns held a conclusive verdict.
    pub comparable: usize,
}

impl fmt::Display for AgreementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}% agreement ({}/{} comparable rows)",
            self.percentage, self.matched, self.comparable
        )
    }
}

/// Score agreement between `reviewer_column` and `automated_column`.
/// Returns `None` when no row is comparable.
pub fn agreement(
    table: &EvalTable,
    reviewer_column: &str,
    automated_column: &str,
) -> Option<AgreementReport> {
    let mut matched = 0usize;
    let mut comparable = 0usize;

    for record in table.records() {
        let reviewer = record.cell(reviewer_column).map(Verdict::from_label);
        let automated = record.cell(automated_column).map(Verdict::from_label);

        if let (Some(reviewer), Some(automated)) = (reviewer, automated) {
            if reviewer.is_conclusive() && automated.is_conclusive() {
                comparable += 1;
                if reviewer == automated {
                    matched += 1;
                }
            }
        }
    }

    if comparable == 0 {
        return None;
    }

    Some(AgreementReport {
        percentage: matched as f64 / comparable as f64 * 100.0,
        matched,
        comparable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdex_core::TestRecord;

    fn row(id: &str, reviewer: &str, automated: &str) -> TestRecord {
        let mut record = TestRecord::new(id, "q");
        record.set_cell("reviewer", reviewer);
        record.set_cell("automated", automated);
        record
    }

    #[test]
    fn test_full_agreement() {
        let table = EvalTable::from_records(vec![
            row("1", "Pass", "Pass"),
            row("2", "Fail", "Fail"),
        ]);
        let report = agreement(&table, "reviewer", "automated").unwrap();
        assert_eq!(report.percentage, 100.0);
        assert_eq!(report.matched, 2);
        assert_eq!(report.comparable, 2);
    }

    #[test]
    fn test_mismatches_lower_the_percentage() {
        let table = EvalTable::from_records(vec![
            row("1", "Pass", "Fail"),
            row("2", "Fail", "Fail"),
        ]);
        let report = agreement(&table, "reviewer", "automated").unwrap();
        assert_eq!(report.percentage, 50.0);
        assert_eq!(report.matched, 1);
        assert_eq!(report.comparable, 2);
    }

    #[test]
    fn test_inconclusive_rows_are_excluded() {
        let table = EvalTable::from_records(vec![
            row("1", "N/A", "Pass"),
            row("2", "Error", "Fail"),
            row("3", "Pass", "Pass"),
            row("4", "maybe", "Fail"),
        ]);
        let report = agreement(&table, "reviewer", "automated").unwrap();
        assert_eq!(report.comparable, 1);
        assert_eq!(report.matched, 1);
        assert_eq!(report.percentage, 100.0);
    }

    #[test]
    fn test_no_comparable_rows_yields_none() {
        let table = EvalTable::from_records(vec![
            row("1", "N/A", "Pass"),
            row("2", "Error", "N/A"),
        ]);
        assert_eq!(agreement(&table, "reviewer", "automated"), None);
    }

    #[test]
    fn test_missing_columns_yield_none_without_error() {
        let table = EvalTable::from_records(vec![TestRecord::new("1", "q")]);
        assert_eq!(agreement(&table, "reviewer", "automated"), None);
    }

    #[test]
    fn test_verdict_labels_parse_loosely() {
        let table = EvalTable::from_records(vec![row("1", " pass ", "PASS")]);
        let report = agreement(&table, "reviewer", "automated").unwrap();
        assert_eq!(report.matched, 1);
    }

    #[test]
    fn test_report_display() {
        let report = AgreementReport {
            percentage: 66.66666666666667,
            matched: 2,
            comparable: 3,
        };
        assert_eq!(report.to_string(), "66.7% agreement (2/3 comparable rows)");
    }
}
