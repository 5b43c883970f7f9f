// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::cli::env::Environment;
use crate::core::{LoaderOptions, UnmatchedPolicy};
use crate::data::{FieldFilter, TableFormat};
use crate::error::{PrepError, Result};
use crate::select::{parse_params, BootstrapPlan, SelectorParams, SelectorRegistry};
use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Join,
    Compile,
    Select,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Join => "join",
            Task::Compile => "compile",
            Task::Select => "select",
        }
    }
}

impl FromStr for Task {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "join" => Ok(Task::Join),
            "compile" => Ok(Task::Compile),
            "select" => Ok(Task::Select),
            _ => Err(PrepError::config(format!(
                "Invalid task '{}'. Use: join, compile, select",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JoinPlan {
    pub phenotypes: PathBuf,
    pub link: PathBuf,
    pub output: Option<PathBuf>,
    pub format: String,
    pub options: LoaderOptions,
}

#[derive(Debug, Clone)]
pub struct CompilePlan {
    pub chromosome_dir: PathBuf,
    pub snps: HashSet<String>,
    pub factors: Vec<String>,
    pub id_column: String,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SelectPlan {
    pub data: PathBuf,
    pub id_column: String,
    pub target: String,
    pub drop_columns: Vec<String>,
    pub selectors: Vec<String>,
    /// One entry per selector, in the same order
    pub params: Vec<SelectorParams>,
    pub bootstrap: BootstrapPlan,
    pub seed: Option<u64>,
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub enum TaskPlan {
    Join(JoinPlan),
    Compile(CompilePlan),
    Select(SelectPlan),
}

pub struct ValidationResult {
    pub task: Task,
    pub plan: TaskPlan,
    /// Directory receiving outputs and the run log
    pub output_dir: Option<PathBuf>,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args, env: &Environment) -> Result<ValidationResult> {
    let task = Task::from_str(&args.task)?;

    if let Some(0) = args.threads {
        return Err(PrepError::config("--threads must be at least 1"));
    }

    let output = args.output.as_deref().map(|o| env.resolve_output(o));
    if output.is_none() && !args.dry_run {
        return Err(PrepError::config(format!(
            "--output is required for task '{}'",
            task.as_str()
        )));
    }

    let plan = match task {
        Task::Join => TaskPlan::Join(validate_join(args, env, output.clone())?),
        Task::Compile => TaskPlan::Compile(validate_compile(args, env, output.clone())?),
        Task::Select => TaskPlan::Select(validate_select(args, env, output.clone())?),
    };

    let output_dir = match (&plan, output) {
        (TaskPlan::Select(_), Some(dir)) => Some(dir),
        (_, Some(file)) => file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .or_else(|| Some(PathBuf::from("."))),
        (_, None) => None,
    };

    Ok(ValidationResult {
        task,
        plan,
        output_dir,
    })
}

fn require(value: &Option<String>, flag: &str, task: &str) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| PrepError::config(format!("--{} is required for task '{}'", flag, task)))
}

fn compile_regex(pattern: &Option<String>, name: &str) -> Result<Option<Regex>> {
    pattern
        .as_deref()
        .map(|p| {
            Regex::new(p)
                .map_err(|e| PrepError::config(format!("Invalid {} regex: {}", name, e)))
        })
        .transpose()
}

fn validate_join(args: &Args, env: &Environment, output: Option<PathBuf>) -> Result<JoinPlan> {
    let phenotypes = env.resolve_input(&require(&args.phenotypes, "phenotypes", "join")?);
    let link = env.resolve_input(&require(&args.link, "link", "join")?);

    match args.format.to_lowercase().as_str() {
        "csv" | "tsv" => {}
        other => {
            return Err(PrepError::config(format!(
                "Unsupported output format: {}. Use: csv, tsv",
                other
            )))
        }
    }

    let phenotype_format = args
        .phenotype_format
        .as_deref()
        .map(TableFormat::from_str)
        .transpose()?;
    if phenotype_format == Some(TableFormat::OxfordSample) {
        return Err(PrepError::config(
            "--phenotype-format sample is only valid for link files",
        ));
    }
    let link_format = args
        .link_format
        .as_deref()
        .map(TableFormat::from_str)
        .transpose()?;

    let field_filter = FieldFilter {
        include_regex: compile_regex(&args.include_fields, "include_fields")?,
        exclude_regex: compile_regex(&args.exclude_fields, "exclude_fields")?,
        include_set: args
            .include_fields_list
            .as_deref()
            .map(|f| load_set_from_file(&env.resolve_input(f)))
            .transpose()?,
        exclude_set: args
            .exclude_fields_list
            .as_deref()
            .map(|f| load_set_from_file(&env.resolve_input(f)))
            .transpose()?,
    };

    Ok(JoinPlan {
        phenotypes,
        link,
        output,
        format: args.format.to_lowercase(),
        options: LoaderOptions {
            phenotype_id_column: args.phenotype_id_column.clone(),
            link_id_column: args.link_id_column.clone(),
            phenotype_format,
            link_format,
            field_filter,
            unmatched_policy: UnmatchedPolicy::from_str(&args.unmatched)?,
        },
    })
}

fn validate_compile(
    args: &Args,
    env: &Environment,
    output: Option<PathBuf>,
) -> Result<CompilePlan> {
    let chromosome_dir =
        env.resolve_input(&require(&args.chromosome_dir, "chromosome-dir", "compile")?);
    if !chromosome_dir.is_dir() {
        return Err(PrepError::config(format!(
            "Chromosome directory '{}' does not exist",
            chromosome_dir.display()
        )));
    }

    let snps = load_set_from_file(&env.resolve_input(&require(
        &args.snps_list,
        "snps-list",
        "compile",
    )?))?;
    if snps.is_empty() {
        return Err(PrepError::config("SNP list is empty"));
    }

    Ok(CompilePlan {
        chromosome_dir,
        snps,
        factors: split_list(args.factors.as_deref()),
        id_column: args.id_column.clone(),
        output,
    })
}

fn validate_select(args: &Args, env: &Environment, output: Option<PathBuf>) -> Result<SelectPlan> {
    let data = env.resolve_input(&require(&args.data, "data", "select")?);
    let target = require(&args.target, "target", "select")?;

    let registry = SelectorRegistry::new();
    let selectors = split_list(Some(&args.selectors));
    if selectors.is_empty() {
        return Err(PrepError::config("--selectors must name at least one selector"));
    }
    registry.resolve(&selectors)?;
    let params = parse_selector_params(&args.selector_params, &selectors)?;

    let bootstraps = args
        .bootstraps
        .as_deref()
        .map(|b| crate::select::SelectionRun::load_bootstraps(&env.resolve_input(b)))
        .transpose()?;
    if bootstraps.is_none() && args.n_bootstraps == 0 {
        return Err(PrepError::config("--n-bootstraps must be at least 1"));
    }
    if let Some(0) = args.n_samples {
        return Err(PrepError::config("--n-samples must be at least 1"));
    }

    Ok(SelectPlan {
        data,
        id_column: args.id_column.clone(),
        target,
        drop_columns: split_list(args.drop_columns.as_deref()),
        selectors,
        params,
        bootstrap: BootstrapPlan {
            n_bootstraps: args.n_bootstraps,
            n_samples: args.n_samples,
            stratify: args.stratify,
            out_name: args.out_name.clone(),
            bootstraps,
        },
        seed: args.seed,
        out_dir: output.unwrap_or_else(|| PathBuf::from(".")),
    })
}

/// Split `a, b,,c` into trimmed, non-empty items
pub fn split_list(list: Option<&str>) -> Vec<String> {
    list.map(|l| {
        l.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Parse `selector:key=value,...` entries into per-selector params
pub fn parse_selector_params(entries: &[String], selectors: &[String]) -> Result<Vec<SelectorParams>> {
    let mut params = vec![SelectorParams::new(); selectors.len()];

    for entry in entries {
        let (name, rest) = entry.split_once(':').ok_or_else(|| {
            PrepError::config(format!(
                "Invalid selector params '{}'. Use: selector:key=value[,key=value]",
                entry
            ))
        })?;
        let slot = selectors
            .iter()
            .position(|s| s == name.trim())
            .ok_or_else(|| {
                PrepError::config(format!(
                    "Selector params given for '{}', which is not among --selectors",
                    name.trim()
                ))
            })?;
        params[slot].extend(parse_params(rest));
    }

    Ok(params)
}

/// Load a set of strings from a file (one per line)
pub fn load_set_from_file(file_path: &Path) -> Result<HashSet<String>> {
    let file = File::open(file_path).map_err(|e| PrepError::from_open(file_path, e))?;

    let reader = BufReader::new(file);
    let mut set = HashSet::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            set.insert(trimmed.to_string());
        }
    }

    println!(
        "📋 Loaded {} items from list file '{}'",
        set.len(),
        file_path.display()
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join_args() -> Args {
        let mut args = Args::empty();
        args.phenotypes = Some("pheno.csv".to_string());
        args.link = Some("chr1.sample".to_string());
        args.output = Some("out/joined.csv".to_string());
        args
    }

    #[test]
    fn test_join_plan() {
        let env = Environment {
            data_dir: Some(PathBuf::from("/data")),
            ..Environment::default()
        };
        let mut args = join_args();
        args.unmatched = "flag".to_string();
        args.exclude_fields = Some("^raw_".to_string());

        let result = validate_args(&args, &env).unwrap();
        assert_eq!(result.task, Task::Join);
        assert_eq!(result.output_dir, Some(PathBuf::from("out")));
        match result.plan {
            TaskPlan::Join(plan) => {
                assert_eq!(plan.phenotypes, PathBuf::from("/data/pheno.csv"));
                assert_eq!(plan.options.unmatched_policy, UnmatchedPolicy::Flag);
                assert!(!plan.options.field_filter.keeps("raw_age"));
            }
            _ => panic!("expected a join plan"),
        }
    }

    #[test]
    fn test_join_errors() {
        let env = Environment::default();

        let mut args = join_args();
        args.link = None;
        assert!(validate_args(&args, &env).is_err());

        let mut args = join_args();
        args.include_fields = Some("(".to_string());
        assert!(matches!(validate_args(&args, &env), Err(PrepError::Config { .. })));

        let mut args = join_args();
        args.format = "nexus".to_string();
        assert!(validate_args(&args, &env).is_err());

        let mut args = join_args();
        args.output = None;
        assert!(validate_args(&args, &env).is_err());
        args.dry_run = true;
        assert!(validate_args(&args, &env).is_ok());
    }

    #[test]
    fn test_select_plan() {
        let mut args = Args::empty();
        args.task = "select".to_string();
        args.data = Some("final.csv".to_string());
        args.target = Some("PHQ9_binary".to_string());
        args.output = Some("feat_select".to_string());
        args.selectors = "mrmr, jmi".to_string();
        args.selector_params = vec!["jmi:n_selected_features=20".to_string()];

        let result = validate_args(&args, &Environment::default()).unwrap();
        assert_eq!(result.output_dir, Some(PathBuf::from("feat_select")));
        match result.plan {
            TaskPlan::Select(plan) => {
                assert_eq!(plan.selectors, vec!["mrmr", "jmi"]);
                assert!(plan.params[0].is_empty());
                assert_eq!(plan.params[1].get("n_selected_features").map(String::as_str), Some("20"));
                assert_eq!(plan.bootstrap.n_bootstraps, 10);
            }
            _ => panic!("expected a select plan"),
        }

        args.selectors = "chi2,lasso".to_string();
        assert!(validate_args(&args, &Environment::default()).is_err());
    }

    #[test]
    fn test_selector_params_must_match_selectors() {
        let selectors = vec!["chi2".to_string()];
        assert!(parse_selector_params(&["mrmr:n_selected_features=2".to_string()], &selectors).is_err());
        assert!(parse_selector_params(&["n_selected_features=2".to_string()], &selectors).is_err());
    }

    #[test]
    fn test_load_set_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snps.txt");
        std::fs::write(&path, "rs123\n\n# comment\n rs456 \nrs123\n").unwrap();

        let set = load_set_from_file(&path).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("rs456"));
        assert!(matches!(
            load_set_from_file(&dir.path().join("none.txt")),
            Err(PrepError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_task_parsing() {
        assert_eq!(Task::from_str("Compile").unwrap(), Task::Compile);
        assert!(Task::from_str("distance").is_err());
        assert_eq!(split_list(Some(" a, ,b ")), vec!["a", "b"]);
        assert!(split_list(None).is_empty());
    }
}
