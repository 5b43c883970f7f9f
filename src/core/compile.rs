// compile.rs - Compile a SNP subset from per-chromosome tables

use crate::data::table::{is_missing, Table, TableFormat};
use crate::data::{read_table, MISSING_VALUE};
use crate::error::{PrepError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Columns taken from one chromosome file, rows sorted by participant ID
#[derive(Debug, Clone)]
pub struct ChromosomeSlice {
    pub file: PathBuf,
    pub columns: Vec<String>,
    pub rows: Vec<(i64, Vec<String>)>,
    pub snps_found: usize,
    pub missing_cells: usize,
}

/// All requested SNPs and factor columns, one row per participant
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTable {
    pub id_column: String,
    pub columns: Vec<String>,
    pub rows: Vec<(i64, Vec<String>)>,
}

impl CompiledTable {
    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.columns.len() + 1);
        headers.push(self.id_column.clone());
        headers.extend(self.columns.iter().cloned());
        headers
    }

    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(|(id, values)| {
            let mut record = Vec::with_capacity(values.len() + 1);
            record.push(id.to_string());
            record.extend(values.iter().cloned());
            record
        })
    }
}

/// Sort key placing `chr2` before `chr10`
fn natural_key(path: &Path) -> (String, u64, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix: String = name.chars().take_while(|c| !c.is_ascii_digit()).collect();
    let number = name[prefix.len()..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(u64::MAX);
    (prefix, number, name)
}

/// List `.csv` files in a chromosome directory in natural order
pub fn list_chromosome_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| PrepError::from_open(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if path.is_file() && is_csv {
            files.push(path);
        }
    }

    files.sort_by_key(|p| natural_key(p));
    Ok(files)
}

/// Pull the requested SNPs and factor columns out of one chromosome table
pub fn compile_file(
    path: &Path,
    snps: &HashSet<String>,
    factors: &[String],
    id_column: &str,
) -> Result<ChromosomeSlice> {
    tracing::info!(file = %path.display(), "compiling chromosome file");
    let table = read_table(path, Some(TableFormat::Csv))?;
    slice_table(&table, snps, factors, id_column)
}

fn slice_table(
    table: &Table,
    snps: &HashSet<String>,
    factors: &[String],
    id_column: &str,
) -> Result<ChromosomeSlice> {
    let id_idx = table.find_id_column(Some(id_column), &[])?;

    // Header order keeps output deterministic
    let snp_columns: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != id_idx && snps.contains(h.as_str()))
        .map(|(i, _)| i)
        .collect();

    let mut factor_columns = Vec::with_capacity(factors.len());
    for factor in factors {
        let idx = table.column_index(factor).ok_or_else(|| {
            PrepError::schema(&table.source, format!("factor column '{}' not found", factor))
        })?;
        factor_columns.push(idx);
    }

    tracing::info!(
        file = %table.source.display(),
        snps = snp_columns.len(),
        "found SNPs"
    );

    let mut missing_cells = 0;
    for &col in &snp_columns {
        let na = table.rows.iter().filter(|r| is_missing(&r[col])).count();
        tracing::debug!(snp = %table.headers[col], missing = na, "missing values");
        missing_cells += na;
    }
    tracing::info!(
        file = %table.source.display(),
        missing = missing_cells,
        rows = table.len(),
        "missing values in total"
    );

    let selected: Vec<usize> = snp_columns.iter().chain(&factor_columns).copied().collect();
    let columns = selected.iter().map(|&i| table.headers[i].clone()).collect();

    let mut rows = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let id = table.participant_id(row, id_idx)?;
        let values = selected.iter().map(|&i| table.rows[row][i].clone()).collect();
        rows.push((id, values));
    }
    rows.sort_by_key(|(id, _)| *id);

    if let Some(w) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(PrepError::schema(
            &table.source,
            format!("participant {} appears twice", w[0].0),
        ));
    }

    Ok(ChromosomeSlice {
        file: table.source.clone(),
        columns,
        snps_found: snp_columns.len(),
        missing_cells,
        rows,
    })
}

/// Combine slices column-wise, aligned on participant ID.
///
/// A column already present (e.g. a factor repeated in every file) keeps its
/// first occurrence. Cells for participants absent from a slice are `NA`.
pub fn merge_slices(slices: &[ChromosomeSlice], id_column: &str) -> CompiledTable {
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut mappings: Vec<Vec<Option<usize>>> = Vec::with_capacity(slices.len());

    for slice in slices {
        let mapping = slice
            .columns
            .iter()
            .map(|c| {
                if seen.contains_key(c) {
                    None
                } else {
                    seen.insert(c.clone(), columns.len());
                    columns.push(c.clone());
                    Some(columns.len() - 1)
                }
            })
            .collect();
        mappings.push(mapping);
    }

    let width = columns.len();
    let mut rows: BTreeMap<i64, Vec<String>> = BTreeMap::new();

    for (slice, mapping) in slices.iter().zip(&mappings) {
        for (id, values) in &slice.rows {
            let row = rows
                .entry(*id)
                .or_insert_with(|| vec![MISSING_VALUE.to_string(); width]);
            for (value, target) in values.iter().zip(mapping) {
                if let Some(t) = target {
                    row[*t] = value.clone();
                }
            }
        }
    }

    CompiledTable {
        id_column: id_column.to_string(),
        columns,
        rows: rows.into_iter().collect(),
    }
}

/// Compile `snps` plus `factors` from every `.csv` in `dir`
pub fn compile_snps(
    snps: &HashSet<String>,
    factors: &[String],
    dir: &Path,
    id_column: &str,
) -> Result<CompiledTable> {
    let files = list_chromosome_files(dir)?;
    if files.is_empty() {
        return Err(PrepError::config(format!(
            "no .csv chromosome files in '{}'",
            dir.display()
        )));
    }

    println!(
        "🧬 Compiling {} SNPs from {} chromosome files in {}",
        snps.len(),
        files.len(),
        dir.display()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let slices = files
        .par_iter()
        .map(|file| {
            let slice = compile_file(file, snps, factors, id_column);
            pb.inc(1);
            slice
        })
        .collect::<Result<Vec<_>>>()?;
    pb.finish_and_clear();

    let found: usize = slices.iter().map(|s| s.snps_found).sum();
    let compiled = merge_slices(&slices, id_column);

    println!(
        "✅ Compiled {} of {} requested SNPs: {} participants × {} columns",
        found,
        snps.len(),
        compiled.rows.len(),
        compiled.columns.len()
    );
    if found < snps.len() {
        println!(
            "⚠️  {} requested SNPs were not found in any file",
            snps.len() - found
        );
    }

    Ok(compiled)
}
