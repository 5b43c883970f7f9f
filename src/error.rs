// error.rs - Error taxonomy shared by loaders, joiner and selectors

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for ukbprep operations
#[derive(Error, Debug)]
pub enum PrepError {
    /// Input path does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Input path exists but could not be opened or read
    #[error("Cannot read '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No participant ID column could be located in a table
    #[error("No participant ID column in '{path}' (tried: {})", tried.join(", "))]
    MissingIdColumn { path: PathBuf, tried: Vec<String> },

    /// Structural problems with a table (duplicate IDs, empty header, ...)
    #[error("Schema error in '{path}': {message}")]
    Schema { path: PathBuf, message: String },

    /// A cell could not be interpreted
    #[error("Parse error in '{path}' at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The join matched no participants at all
    #[error(
        "Join produced zero matching rows ({link_rows} link rows: {withdrawn} withdrawn, {unmatched} without phenotype data)"
    )]
    EmptyJoin {
        link_rows: usize,
        withdrawn: usize,
        unmatched: usize,
    },

    /// Invalid arguments or configuration values
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Feature selection could not run
    #[error("Feature selection error: {message}")]
    Selection { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PrepError>;

impl PrepError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn selection(message: impl Into<String>) -> Self {
        Self::Selection {
            message: message.into(),
        }
    }

    pub fn schema(path: &Path, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn parse(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Classify an open/read failure so a missing file is reported as such
    pub fn from_open(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_classified() {
        let err = PrepError::from_open(
            Path::new("/nope/pheno.csv"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, PrepError::FileNotFound { .. }));
        assert_eq!(err.to_string(), "File not found: /nope/pheno.csv");
    }

    #[test]
    fn test_permission_is_unreadable() {
        let err = PrepError::from_open(
            Path::new("pheno.csv"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, PrepError::Unreadable { .. }));
        assert!(err.to_string().contains("pheno.csv"));
    }

    #[test]
    fn test_missing_id_column_lists_candidates() {
        let err = PrepError::MissingIdColumn {
            path: PathBuf::from("link.csv"),
            tried: vec!["ID_1".to_string(), "IID".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No participant ID column in 'link.csv' (tried: ID_1, IID)"
        );
    }
}
