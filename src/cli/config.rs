// config.rs - Configuration file support

use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub task: Option<String>,

    // Input/Output
    pub phenotypes: Option<String>,
    pub link: Option<String>,
    pub output: Option<String>,
    pub format: Option<String>,

    // Join settings
    pub phenotype_id_column: Option<String>,
    pub link_id_column: Option<String>,
    pub phenotype_format: Option<String>,
    pub link_format: Option<String>,
    pub unmatched: Option<String>,

    // Field filtering
    pub include_fields: Option<String>,
    pub exclude_fields: Option<String>,
    pub include_fields_list: Option<String>,
    pub exclude_fields_list: Option<String>,

    // SNP compilation
    pub chromosome_dir: Option<String>,
    pub snps_list: Option<String>,
    pub factors: Option<Vec<String>>,
    pub id_column: Option<String>,

    // Feature selection
    pub data: Option<String>,
    pub target: Option<String>,
    pub drop_columns: Option<Vec<String>>,
    pub selectors: Option<Vec<String>>,
    pub selector_params: Option<Vec<String>>,
    pub n_bootstraps: Option<usize>,
    pub n_samples: Option<usize>,
    pub stratify: Option<bool>,
    pub seed: Option<u64>,
    pub bootstraps: Option<String>,
    pub out_name: Option<String>,

    // Performance
    pub threads: Option<usize>,

    // Flags
    pub dry_run: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| PrepError::from_open(path, e))?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            PrepError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| PrepError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# ukbprep.toml - Configuration file for ukbprep
# Command line arguments will override these settings.
# Relative input paths are resolved against $UKB_DATA_DIR,
# relative output paths against $UKB_OUTPUT_DIR.

# Task to run: join, compile, select
task = "join"

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Phenotype table keyed by participant ID (.csv or .tsv)
phenotypes = "phenotypes/depression.csv"

# Genetic link file in genotype row order (.csv, .tsv or Oxford .sample)
link = "imputed/ukb22828_c1_b0_v3_s487253.sample"

# Output file (join, compile) or directory (select)
output = "joined/depression_chr1.csv"

# Output format for joined data: csv, tsv
format = "csv"

# =============================================================================
# JOIN SETTINGS
# =============================================================================

# Participant ID columns (omit to auto-detect)
# phenotype_id_column = "eid"
# link_id_column = "ID_1"

# Link rows without phenotype data: exclude, flag
unmatched = "exclude"

# Include only phenotype fields matching regex pattern
# include_fields = "^(PHQ9|Sex|Age)"

# Exclude phenotype fields matching regex pattern
# exclude_fields = "_raw$"

# Field lists (one field per line)
# include_fields_list = "fields.txt"
# exclude_fields_list = "drop_fields.txt"

# =============================================================================
# SNP COMPILATION (task = "compile")
# =============================================================================

# chromosome_dir = "snps/per_chromosome"
# snps_list = "snps/candidate_rsids.txt"
# factors = ["PHQ9_binary", "Sex"]
id_column = "ID_1"

# =============================================================================
# FEATURE SELECTION (task = "select")
# =============================================================================

# data = "final/depression_allsnps.csv"
# target = "PHQ9_binary"
# drop_columns = ["Sex"]
selectors = ["chi2", "infogain"]
# selector_params = ["mrmr:n_selected_features=50", "jmi:n_selected_features=50"]
n_bootstraps = 10
# n_samples = 1000
stratify = false
# seed = 42
# bootstraps = "feat_select/previous_bootstraps.csv"
out_name = "selection"

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
# threads = 16

# Validate inputs without computation (dry run)
dry_run = false
"#
        .to_string()
    }
}
