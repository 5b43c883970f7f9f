// delimited.rs - CSV/TSV loader backed by the csv crate

use crate::data::table::Table;
use crate::error::{PrepError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Convert a csv error into a located parse error
pub(crate) fn csv_error(path: &Path, err: csv::Error) -> PrepError {
    let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => PrepError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
        kind => PrepError::parse(path, line, format!("{:?}", kind)),
    }
}

impl Table {
    /// Load a delimited file with a header row.
    ///
    /// Lines starting with `#` are comments. Every row must have as many
    /// fields as the header.
    pub fn from_delimited(path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path).map_err(|e| PrepError::from_open(path, e))?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(path, e))?
            .iter()
            .map(|s| s.to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(PrepError::schema(path, "file is empty or has no header"));
        }

        let mut table = Table::new(path.to_path_buf(), headers);

        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

            if record.len() != table.headers.len() {
                return Err(PrepError::parse(
                    path,
                    line,
                    format!(
                        "row has {} fields, expected {}",
                        record.len(),
                        table.headers.len()
                    ),
                ));
            }

            table.rows.push(record.iter().map(|s| s.to_string()).collect());
            table.lines.push(line);
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_reads_csv_with_quotes_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "pheno.csv",
            "# exported by ukbconv\neid,\"smoking status\",age\n1001,\"never, ever\",40\n1002,current,55\n",
        );

        let table = Table::from_delimited(&path, b',').unwrap();
        assert_eq!(table.headers, vec!["eid", "smoking status", "age"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][1], "never, ever");
    }

    #[test]
    fn test_reads_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "pheno.tab", "f.eid\tf.31.0.0\n7\t1\n");

        let table = Table::from_delimited(&path, b'\t').unwrap();
        assert_eq!(table.headers, vec!["f.eid", "f.31.0.0"]);
        assert_eq!(table.rows, vec![vec!["7".to_string(), "1".to_string()]]);
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "eid,age\n1,40\n2\n");

        match Table::from_delimited(&path, b',') {
            Err(PrepError::Parse { line, message, .. }) => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 2"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.csv", "");
        assert!(matches!(
            Table::from_delimited(&path, b','),
            Err(PrepError::Schema { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        match Table::from_delimited(&path, b',') {
            Err(PrepError::FileNotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }
}
