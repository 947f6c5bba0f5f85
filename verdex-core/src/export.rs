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

//! CSV export of (annotated) tables.
//!
//! Output is UTF-8, comma-separated, one header row, one line per
//! record. Round-tripping an export through the loader reproduces the
//! same column set and row count.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::types::EvalTable;

/// Write a table as CSV to any writer. Unset cells serialize empty.
pub fn write_csv<W: io::Write>(table: &EvalTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.columns())?;
    for record in table.records() {
        let row: Vec<&str> = table
            .columns()
            .iter()
            .map(|column| record.cell(column).unwrap_or(""))
            .collect();
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write a table as CSV to a file path.
pub fn write_csv_path(table: &EvalTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_csv(table, File::create(path)?)?;
    debug!(rows = table.len(), "wrote dataset to {}", path.display());
    Ok(())
}

/// Render a table as an in-memory CSV string.
pub fn to_csv_string(table: &EvalTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
