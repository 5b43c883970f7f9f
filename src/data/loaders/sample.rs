// sample.rs - Oxford .sample loader (whitespace separated, type row on line 2)

use crate::data::table::Table;
use crate::error::{PrepError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

impl Table {
    /// Load an Oxford-format `.sample` file.
    ///
    /// Line 1 holds column names, line 2 holds column types (`0 0 0 D ...`)
    /// and is skipped. Row order is preserved.
    pub fn from_oxford_sample(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PrepError::from_open(path, e))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines().enumerate();

        let header_line = match lines.next() {
            Some((_, line)) => line.map_err(|e| PrepError::from_open(path, e))?,
            None => return Err(PrepError::schema(path, "file is empty or has no header")),
        };
        let headers: Vec<String> = header_line
            .split_whitespace()
            .map(|s| s.to_string())
            .collect();
        if headers.is_empty() {
            return Err(PrepError::schema(path, "file is empty or has no header"));
        }

        match lines.next() {
            Some((_, line)) => {
                let line = line.map_err(|e| PrepError::from_open(path, e))?;
                if line.split_whitespace().next() != Some("0") {
                    return Err(PrepError::parse(
                        path,
                        2,
                        "expected the column-type row (starting with 0)",
                    ));
                }
            }
            None => return Err(PrepError::schema(path, "missing column-type row")),
        }

        let mut table = Table::new(path.to_path_buf(), headers);

        for (idx, line) in lines {
            let line = line.map_err(|e| PrepError::from_open(path, e))?;
            let line_num = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let parts: Vec<String> = line.split_whitespace().map(|s| s.to_string()).collect();
            if parts.len() != table.headers.len() {
                return Err(PrepError::parse(
                    path,
                    line_num,
                    format!(
                        "row has {} fields, expected {}",
                        parts.len(),
                        table.headers.len()
                    ),
                ));
            }

            table.rows.push(parts);
            table.lines.push(line_num);
        }

        Ok(table)
    }
}
