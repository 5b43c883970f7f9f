// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config, Environment};
use crate::error::Result;

/// Replace `field` with the config value only while it still holds the CLI default
fn fill_default<T: PartialEq>(field: &mut T, default: T, value: Option<T>) {
    if *field == default {
        if let Some(value) = value {
            *field = value;
        }
    }
}

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        fill_default(&mut self.task, "join".to_string(), config.task);

        // Input/Output
        if self.phenotypes.is_none() {
            self.phenotypes = config.phenotypes;
        }
        if self.link.is_none() {
            self.link = config.link;
        }
        if self.output.is_none() {
            self.output = config.output;
        }
        fill_default(&mut self.format, "csv".to_string(), config.format);

        // Join settings
        if self.phenotype_id_column.is_none() {
            self.phenotype_id_column = config.phenotype_id_column;
        }
        if self.link_id_column.is_none() {
            self.link_id_column = config.link_id_column;
        }
        if self.phenotype_format.is_none() {
            self.phenotype_format = config.phenotype_format;
        }
        if self.link_format.is_none() {
            self.link_format = config.link_format;
        }
        fill_default(&mut self.unmatched, "exclude".to_string(), config.unmatched);

        // Field filtering
        if self.include_fields.is_none() {
            self.include_fields = config.include_fields;
        }
        if self.exclude_fields.is_none() {
            self.exclude_fields = config.exclude_fields;
        }
        if self.include_fields_list.is_none() {
            self.include_fields_list = config.include_fields_list;
        }
        if self.exclude_fields_list.is_none() {
            self.exclude_fields_list = config.exclude_fields_list;
        }

        // SNP compilation
        if self.chromosome_dir.is_none() {
            self.chromosome_dir = config.chromosome_dir;
        }
        if self.snps_list.is_none() {
            self.snps_list = config.snps_list;
        }
        if self.factors.is_none() {
            self.factors = config.factors.map(|f| f.join(","));
        }
        fill_default(&mut self.id_column, "ID_1".to_string(), config.id_column);

        // Feature selection
        if self.data.is_none() {
            self.data = config.data;
        }
        if self.target.is_none() {
            self.target = config.target;
        }
        if self.drop_columns.is_none() {
            self.drop_columns = config.drop_columns.map(|d| d.join(","));
        }
        fill_default(
            &mut self.selectors,
            "chi2,infogain".to_string(),
            config.selectors.map(|s| s.join(",")),
        );
        if self.selector_params.is_empty() {
            self.selector_params = config.selector_params.unwrap_or_default();
        }
        fill_default(&mut self.n_bootstraps, 10, config.n_bootstraps);
        if self.n_samples.is_none() {
            self.n_samples = config.n_samples;
        }
        if self.seed.is_none() {
            self.seed = config.seed;
        }
        if self.bootstraps.is_none() {
            self.bootstraps = config.bootstraps;
        }
        fill_default(&mut self.out_name, "selection".to_string(), config.out_name);

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.stratify && config.stratify.unwrap_or(false) {
            self.stratify = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }

    /// Apply the config named by `--config`, falling back to `$UKBPREP_CONFIG`
    pub fn with_environment(self, env: &Environment) -> Result<Self> {
        match self.config.clone().or_else(|| env.config.clone()) {
            Some(path) => self.with_config_file(&path),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_wins_over_config() {
        let mut args = Args::empty();
        args.unmatched = "flag".to_string();
        args.phenotypes = Some("cli.csv".to_string());

        let config = Config {
            phenotypes: Some("config.csv".to_string()),
            link: Some("chr1.sample".to_string()),
            unmatched: Some("exclude".to_string()),
            format: Some("tsv".to_string()),
            selectors: Some(vec!["mrmr".to_string(), "jmi".to_string()]),
            stratify: Some(true),
            ..Config::new()
        };
        let merged = args.merge_with_config(config);

        assert_eq!(merged.phenotypes.as_deref(), Some("cli.csv"));
        assert_eq!(merged.link.as_deref(), Some("chr1.sample"));
        assert_eq!(merged.unmatched, "flag");
        assert_eq!(merged.format, "tsv");
        assert_eq!(merged.selectors, "mrmr,jmi");
        assert!(merged.stratify);
    }

    #[test]
    fn test_config_path_from_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.toml");
        std::fs::write(&path, "task = \"compile\"\n").unwrap();

        let env = Environment {
            config: Some(path.to_string_lossy().to_string()),
            ..Environment::default()
        };
        assert_eq!(Args::empty().with_environment(&env).unwrap().task, "compile");

        // an explicit --config replaces the environment default
        let mut args = Args::empty();
        args.config = Some(dir.path().join("absent.toml").to_string_lossy().to_string());
        assert!(args.with_environment(&env).is_err());
    }
}
