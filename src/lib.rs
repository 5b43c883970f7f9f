// lib.rs - ukbprep library root

//! # ukbprep - UK Biobank phenotype/genotype preparation
//!
//! Joins participant phenotype tables with the genetic link files that give
//! the row order of genotype data, compiles per-chromosome SNP tables into one
//! matrix, and runs bootstrapped feature selection over the result.
//!
//! ## Features
//!
//! - **Link-order join**: output rows follow the genetic link file
//! - **Withdrawal handling**: negative sentinel IDs never match a participant
//! - **Flexible inputs**: CSV, TSV and Oxford `.sample` link files
//! - **Field filtering**: regex and list-file selection of phenotype fields
//! - **Feature selection**: chi2, information gain, Mann-Whitney U, mRMR, JMI
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use ukbprep::prelude::*;
//!
//! let loader = DataLoader::new();
//! let joined = loader.load_and_join(
//!     std::path::Path::new("phenotypes.csv"),
//!     std::path::Path::new("ukb_imp_chr1.sample"),
//! )?;
//!
//! for row in &joined.rows {
//!     println!("{} {} {:?}", row.position, row.participant_id, row.values);
//! }
//! # Ok::<(), ukbprep::PrepError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod logging;
pub mod output;
pub mod select;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, Environment, ValidationResult};
    pub use crate::core::{compile_snps, CompiledTable};
    pub use crate::core::{DataLoader, JoinReport, JoinedDataset, LoaderOptions, UnmatchedPolicy};
    pub use crate::data::{FieldFilter, LinkEntry, LinkTable, PhenotypeTable, TableFormat};
    pub use crate::error::{PrepError, Result};
    pub use crate::output::{write_joined, write_summary, RunSummary};
    pub use crate::select::{Dataset, FeatureSelector, SelectionRun, SelectorRegistry};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{DataLoader, JoinedDataset, UnmatchedPolicy};
pub use error::{PrepError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "ukbprep v{} - UK Biobank phenotype/genotype preparation",
        VERSION
    )
}
