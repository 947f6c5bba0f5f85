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

//! Verdex Core
//!
//! Fundamental data structures and dataset I/O for the Verdex
//! evaluation engine: test records and tables, scores and verdicts,
//! the shared error taxonomy, and the CSV/JSON loader and exporter.

pub mod error;
pub mod export;
pub mod loader;
pub mod types;

pub use error::{Result, VerdexError};
pub use export::{to_csv_string, write_csv, write_csv_path};
pub use loader::{from_csv_reader, from_json_str, load_path};
pub use types::{
    canonical_name, columns, non_blank, Criterion, EvalTable, MetricScore, TestRecord, Verdict,
};
