// table.rs - Generic in-memory string table

use crate::error::{PrepError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Marker written for cells with no value
pub const MISSING_VALUE: &str = "NA";

/// Column names tried, in order, when a phenotype ID column is not configured
pub const PHENOTYPE_ID_CANDIDATES: &[&str] =
    &["eid", "f.eid", "ID_1", "IID", "participant_id", "ID"];

/// Column names tried, in order, when a link ID column is not configured
pub const LINK_ID_CANDIDATES: &[&str] = &["ID_1", "IID", "eid", "ID"];

/// On-disk layout of a tabular input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    /// Oxford `.sample`: whitespace separated, second line holds column types
    OxfordSample,
}

impl TableFormat {
    /// Guess the format from the file extension (defaults to CSV)
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("tab") | Some("txt") => TableFormat::Tsv,
            Some("sample") => TableFormat::OxfordSample,
            _ => TableFormat::Csv,
        }
    }

    pub fn delimiter(&self) -> u8 {
        match self {
            TableFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

impl FromStr for TableFormat {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(TableFormat::Csv),
            "tsv" | "tab" => Ok(TableFormat::Tsv),
            "sample" | "oxford" => Ok(TableFormat::OxfordSample),
            _ => Err(PrepError::config(format!(
                "Unsupported table format: {}. Use: csv, tsv, sample",
                s
            ))),
        }
    }
}

/// Header plus string rows, exactly as read
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub source: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// 1-based file line of each row, for error messages
    pub lines: Vec<usize>,
}

impl Table {
    pub fn new(source: PathBuf, headers: Vec<String>) -> Self {
        Self {
            source,
            headers,
            rows: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Locate the participant ID column.
    ///
    /// An explicit name must exist; otherwise the first candidate present wins.
    pub fn find_id_column(&self, explicit: Option<&str>, candidates: &[&str]) -> Result<usize> {
        if let Some(name) = explicit {
            return self
                .column_index(name)
                .ok_or_else(|| PrepError::MissingIdColumn {
                    path: self.source.clone(),
                    tried: vec![name.to_string()],
                });
        }

        candidates
            .iter()
            .find_map(|c| self.column_index(c))
            .ok_or_else(|| PrepError::MissingIdColumn {
                path: self.source.clone(),
                tried: candidates.iter().map(|c| c.to_string()).collect(),
            })
    }

    /// Parse the participant ID in `column` of row `row`
    pub fn participant_id(&self, row: usize, column: usize) -> Result<i64> {
        let raw = self.rows[row][column].as_str();
        parse_participant_id(raw).ok_or_else(|| {
            PrepError::parse(
                &self.source,
                self.lines[row],
                format!(
                    "'{}' in column '{}' is not an integer participant ID",
                    raw, self.headers[column]
                ),
            )
        })
    }
}

/// Parse a participant ID cell; surrounding quotes and whitespace are ignored
pub fn parse_participant_id(raw: &str) -> Option<i64> {
    raw.trim().trim_matches('"').parse::<i64>().ok()
}

/// True for the usual spellings of an empty cell
pub fn is_missing(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == MISSING_VALUE || v.eq_ignore_ascii_case("nan")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut t = Table::new(
            PathBuf::from("t.csv"),
            vec!["eid".to_string(), "age".to_string()],
        );
        t.rows.push(vec!["1001".to_string(), "40".to_string()]);
        t.rows.push(vec!["abc".to_string(), "55".to_string()]);
        t.lines = vec![2, 3];
        t
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TableFormat::from_path(Path::new("a.csv")), TableFormat::Csv);
        assert_eq!(TableFormat::from_path(Path::new("a.TSV")), TableFormat::Tsv);
        assert_eq!(TableFormat::from_path(Path::new("ukb.tab")), TableFormat::Tsv);
        assert_eq!(
            TableFormat::from_path(Path::new("chr1.sample")),
            TableFormat::OxfordSample
        );
        assert_eq!(TableFormat::from_path(Path::new("noext")), TableFormat::Csv);
        assert!("parquet".parse::<TableFormat>().is_err());
    }

    #[test]
    fn test_find_id_column() {
        let t = table();
        assert_eq!(t.find_id_column(None, PHENOTYPE_ID_CANDIDATES).unwrap(), 0);
        assert_eq!(t.find_id_column(Some("age"), &[]).unwrap(), 1);

        let err = t.find_id_column(None, &["ID_1", "IID"]).unwrap_err();
        assert!(matches!(err, PrepError::MissingIdColumn { .. }));
        assert!(t.find_id_column(Some("ID_1"), &[]).is_err());
    }

    #[test]
    fn test_participant_id_reports_line() {
        let t = table();
        assert_eq!(t.participant_id(0, 0).unwrap(), 1001);
        match t.participant_id(1, 0) {
            Err(PrepError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_markers() {
        assert!(is_missing(""));
        assert!(is_missing(" NA "));
        assert!(is_missing("NaN"));
        assert!(!is_missing("0"));
        assert_eq!(parse_participant_id(" \"-3\" "), Some(-3));
    }
}
