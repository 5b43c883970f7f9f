// mod.rs - Table writers and run summaries

use crate::core::compile::CompiledTable;
use crate::core::join::{JoinReport, JoinedDataset};
use crate::error::{PrepError, Result};
use crate::select::SelectionResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Ensure parent directory exists before creating file
pub fn ensure_parent_dir(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn delimiter_for(format: &str) -> Result<u8> {
    match format.to_lowercase().as_str() {
        "csv" => Ok(b','),
        "tsv" => Ok(b'\t'),
        _ => Err(PrepError::config(format!(
            "Unsupported output format: {}. Use: csv, tsv",
            format
        ))),
    }
}

/// Write a header row plus records; returns the number of records written
pub fn write_table<I>(path: &Path, format: &str, headers: &[String], records: I) -> Result<usize>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let delimiter = delimiter_for(format)?;
    ensure_parent_dir(path)?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    writer.write_record(headers)?;

    let mut written = 0;
    for record in records {
        writer.write_record(&record)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Write the joined dataset in link order
pub fn write_joined(path: &Path, format: &str, dataset: &JoinedDataset) -> Result<()> {
    let rows = write_table(path, format, &dataset.headers(), dataset.records())?;
    println!("✅ Joined dataset ({} rows) written to: {}", rows, path.display());
    Ok(())
}

pub fn write_compiled(path: &Path, table: &CompiledTable) -> Result<()> {
    let rows = write_table(path, "csv", &table.headers(), table.records())?;
    println!("✅ Compiled SNP table ({} rows) written to: {}", rows, path.display());
    Ok(())
}

pub fn write_selection(path: &Path, result: &SelectionResult) -> Result<()> {
    write_table(path, "csv", &result.headers(), result.records())?;
    tracing::debug!(selector = %result.selector, path = %path.display(), "selection written");
    Ok(())
}

/// MD5 of a file, streamed in blocks
pub fn file_md5(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| PrepError::from_open(path, e))?;
    let mut reader = BufReader::new(file);
    let mut context = md5::Context::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        context.consume(&buffer[..n]);
    }
    Ok(format!("{:x}", context.compute()))
}

#[derive(Debug, Clone, Serialize)]
pub struct InputChecksum {
    pub path: PathBuf,
    pub md5: String,
}

/// Provenance record written next to each output
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: String,
    pub version: String,
    pub generated: DateTime<Utc>,
    pub command: String,
    pub task: String,
    pub inputs: Vec<InputChecksum>,
    pub outputs: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<JoinReport>,
}

impl RunSummary {
    pub fn new(task: &str, command: &str) -> Self {
        Self {
            tool: "ukbprep".to_string(),
            version: crate::VERSION.to_string(),
            generated: Utc::now(),
            command: command.to_string(),
            task: task.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            report: None,
        }
    }

    /// Record an input file together with its checksum
    pub fn add_input(&mut self, path: &Path) -> Result<()> {
        let md5 = file_md5(path)?;
        self.inputs.push(InputChecksum {
            path: path.to_path_buf(),
            md5,
        });
        Ok(())
    }

    pub fn add_output(&mut self, path: &Path) {
        self.outputs.push(path.to_path_buf());
    }
}

/// `<output>.summary.json`
pub fn summary_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".summary.json");
    PathBuf::from(name)
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| PrepError::config(format!("Failed to serialize run summary: {}", e)))?;
    std::fs::write(path, json)?;
    println!("📝 Run summary written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_table_tsv_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.tsv");
        let headers = vec!["a".to_string(), "b".to_string()];
        let rows = vec![vec!["1".to_string(), "x y".to_string()]];

        assert_eq!(write_table(&path, "TSV", &headers, rows).unwrap(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\tb\n1\tx y\n");
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.phylip");
        assert!(matches!(
            write_table(&path, "phylip", &[], Vec::<Vec<String>>::new()),
            Err(PrepError::Config { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_file_md5() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "abc").unwrap();
        assert_eq!(file_md5(&path).unwrap(), "900150983cd24fb0d6963f7d28e17f72");

        assert!(matches!(
            file_md5(&dir.path().join("gone.csv")),
            Err(PrepError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_summary_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "abc").unwrap();
        let output = dir.path().join("joined.csv");

        let mut summary = RunSummary::new("join", "ukbprep --task join");
        summary.add_input(&input).unwrap();
        summary.add_output(&output);

        let path = summary_path(&output);
        assert!(path.to_string_lossy().ends_with("joined.csv.summary.json"));
        write_summary(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["task"], "join");
        assert_eq!(value["inputs"][0]["md5"], "900150983cd24fb0d6963f7d28e17f72");
        assert!(value.get("report").is_none());
    }
}
