// bootstrap.rs - Bootstrapped feature selection with aggregated scores

use super::dataset::Dataset;
use super::traits::{format_number, FeatureSelector, SelectorParams};
use crate::data::read_table;
use crate::data::table::{is_missing, parse_participant_id, TableFormat, MISSING_VALUE};
use crate::error::{PrepError, Result};
use crate::output::{write_selection, write_table};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// How the bootstrap samples of one run are drawn
#[derive(Debug, Clone, Default)]
pub struct BootstrapPlan {
    pub n_bootstraps: usize,
    /// Sample size; the dataset size when absent
    pub n_samples: Option<usize>,
    /// Keep class proportions of the target in every sample
    pub stratify: bool,
    /// Prefix of the per-selector folders and the aggregate files
    pub out_name: String,
    /// Reuse previously drawn samples instead of drawing new ones
    pub bootstraps: Option<Vec<Vec<i64>>>,
}

/// Per-feature totals across bootstraps for each selector
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapAggregate {
    pub snps: Vec<String>,
    pub selectors: Vec<String>,
    /// `totals[selector][snp]`
    pub totals: Vec<Vec<f64>>,
    /// Number of bootstraps where the score was NaN or absent
    pub nans: Vec<Vec<usize>>,
    pub n_bootstraps: usize,
}

impl BootstrapAggregate {
    fn new(snps: Vec<String>, selectors: Vec<String>, n_bootstraps: usize) -> Self {
        let width = snps.len();
        let n = selectors.len();
        Self {
            snps,
            selectors,
            totals: vec![vec![0.0; width]; n],
            nans: vec![vec![0; width]; n],
            n_bootstraps,
        }
    }

    fn add(&mut self, selector: usize, scores: &HashMap<&str, f64>) {
        for (i, snp) in self.snps.iter().enumerate() {
            match scores.get(snp.as_str()) {
                Some(v) if !v.is_nan() => self.totals[selector][i] += v,
                _ => self.nans[selector][i] += 1,
            }
        }
    }

    /// total / (bootstraps - nan); NaN when every bootstrap was NaN
    pub fn average(&self, selector: usize, snp: usize) -> f64 {
        let valid = self.n_bootstraps - self.nans[selector][snp];
        if valid == 0 {
            f64::NAN
        } else {
            self.totals[selector][snp] / valid as f64
        }
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["SNP".to_string()];
        for name in &self.selectors {
            headers.push(format!("total_{}", name));
            headers.push(format!("nan_{}", name));
        }
        headers.extend(self.selectors.iter().map(|name| format!("average_{}", name)));
        headers
    }

    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        (0..self.snps.len()).map(move |i| {
            let mut record = vec![self.snps[i].clone()];
            for s in 0..self.selectors.len() {
                record.push(format_number(self.totals[s][i]));
                record.push(self.nans[s][i].to_string());
            }
            record.extend((0..self.selectors.len()).map(|s| format_number(self.average(s, i))));
            record
        })
    }
}

/// Feature selection over one dataset, writing into `out_folder`
pub struct SelectionRun {
    data: Dataset,
    out_folder: PathBuf,
    rng: StdRng,
}

impl SelectionRun {
    /// Creates `out_folder` if needed; a seed makes sampling reproducible
    pub fn new(data: Dataset, out_folder: &Path, seed: Option<u64>) -> Result<Self> {
        std::fs::create_dir_all(out_folder)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            data,
            out_folder: out_folder.to_path_buf(),
            rng,
        })
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn out_folder(&self) -> &Path {
        &self.out_folder
    }

    /// Row indices of one resample drawn with replacement
    pub fn bootstrap(&mut self, n_samples: Option<usize>, stratify: bool) -> Vec<usize> {
        let total = self.data.len();
        let n = n_samples.unwrap_or(total);
        if total == 0 || n == 0 {
            return Vec::new();
        }

        if !stratify {
            return (0..n).map(|_| self.rng.gen_range(0..total)).collect();
        }

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut class_slot: HashMap<i64, usize> = HashMap::new();
        for (row, class) in self.data.target.iter().enumerate() {
            let slot = *class_slot.entry(*class).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(row);
        }

        // Floor of the proportional share, remainder to the largest fractions
        let mut allocation: Vec<usize> = groups.iter().map(|g| n * g.len() / total).collect();
        let remaining = n - allocation.iter().sum::<usize>();
        let mut by_fraction: Vec<usize> = (0..groups.len()).collect();
        by_fraction.sort_by_key(|&g| std::cmp::Reverse(n * groups[g].len() % total));
        for &g in by_fraction.iter().take(remaining) {
            allocation[g] += 1;
        }

        let mut rows = Vec::with_capacity(n);
        for (group, count) in groups.iter().zip(allocation) {
            for _ in 0..count {
                rows.push(group[self.rng.gen_range(0..group.len())]);
            }
        }
        rows.shuffle(&mut self.rng);
        rows
    }

    /// Read bootstrap ID lists: one column per bootstrap after a label column
    pub fn load_bootstraps(path: &Path) -> Result<Vec<Vec<i64>>> {
        let table = read_table(path, Some(TableFormat::from_path(path)))?;
        if table.headers.len() < 2 {
            return Err(PrepError::schema(path, "expected a label column and at least one bootstrap column"));
        }

        let mut bootstraps = vec![Vec::new(); table.headers.len() - 1];
        for (row, cells) in table.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate().skip(1) {
                if is_missing(cell) {
                    continue;
                }
                let id = parse_participant_id(cell)
                    .or_else(|| {
                        cell.trim()
                            .parse::<f64>()
                            .ok()
                            .filter(|v| v.fract() == 0.0)
                            .map(|v| v as i64)
                    })
                    .ok_or_else(|| {
                        PrepError::parse(
                            path,
                            table.lines[row],
                            format!("'{}' in column '{}' is not a participant ID", cell, table.headers[col]),
                        )
                    })?;
                bootstraps[col - 1].push(id);
            }
        }

        println!("📊 Loaded {} bootstraps from {}", bootstraps.len(), path.display());
        Ok(bootstraps)
    }

    /// Rows for the given participants, repetitions allowed
    pub fn sample_from_ids(&self, ids: &[i64]) -> Result<Dataset> {
        let index = self.data.id_index();
        let rows = ids
            .iter()
            .map(|id| {
                index.get(id).copied().ok_or_else(|| {
                    PrepError::selection(format!(
                        "bootstrap participant {} is not in the selection dataset",
                        id
                    ))
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        Ok(self.data.subset(&rows))
    }

    /// Run every selector on every bootstrap and aggregate their scores
    pub fn bootstrapped_feat_select(
        &mut self,
        plan: &BootstrapPlan,
        selectors: &[&dyn FeatureSelector],
        selector_names: &[String],
        selector_params: &[SelectorParams],
    ) -> Result<BootstrapAggregate> {
        if selectors.len() != selector_names.len() {
            return Err(PrepError::selection(
                "selector list must be as long as selector name list",
            ));
        }
        if selectors.len() != selector_params.len() {
            return Err(PrepError::selection(
                "selector list must be as long as selector params list",
            ));
        }
        if selectors.is_empty() {
            return Err(PrepError::selection("no selectors given"));
        }

        let n_bootstraps = plan
            .bootstraps
            .as_ref()
            .map_or(plan.n_bootstraps, |b| b.len());
        if n_bootstraps == 0 {
            return Err(PrepError::selection("at least one bootstrap is required"));
        }

        println!(
            "🎲 Running {} over {} bootstraps of {} participants",
            selector_names.join(", "),
            n_bootstraps,
            plan.n_samples.unwrap_or(self.data.len())
        );

        let folders: Vec<PathBuf> = selector_names
            .iter()
            .map(|name| self.out_folder.join(format!("{}_{}", plan.out_name, name)))
            .collect();
        for folder in &folders {
            std::fs::create_dir_all(folder)?;
        }

        let pb = ProgressBar::new(n_bootstraps as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} bootstraps")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut exported: Vec<Vec<i64>> = Vec::with_capacity(n_bootstraps);
        let mut aggregate: Option<BootstrapAggregate> = None;

        for i in 0..n_bootstraps {
            let start = Instant::now();
            let sample = match &plan.bootstraps {
                Some(bootstraps) => self.sample_from_ids(&bootstraps[i])?,
                None => {
                    let rows = self.bootstrap(plan.n_samples, plan.stratify);
                    self.data.subset(&rows)
                }
            };
            tracing::info!(bootstrap = i, rows = sample.len(), elapsed = ?start.elapsed(), "sample ready");

            for (s, selector) in selectors.iter().enumerate() {
                let start = Instant::now();
                let result = selector.select(&sample, &selector_params[s])?;
                let file = folders[s].join(format!("{}_{}.csv", selector_names[s], i));
                write_selection(&file, &result)?;
                tracing::info!(
                    selector = %selector_names[s],
                    bootstrap = i,
                    elapsed = ?start.elapsed(),
                    "selector finished"
                );

                let agg = aggregate.get_or_insert_with(|| {
                    BootstrapAggregate::new(
                        result.rows.iter().map(|(snp, _)| snp.clone()).collect(),
                        selector_names.to_vec(),
                        n_bootstraps,
                    )
                });
                agg.add(s, &result.scores());
            }

            exported.push(sample.ids);
            pb.inc(1);
        }
        pb.finish_and_clear();

        let aggregate = aggregate.ok_or_else(|| PrepError::selection("no selector results"))?;

        let final_path = self.out_folder.join(format!("{}.csv", plan.out_name));
        write_table(&final_path, "csv", &aggregate.headers(), aggregate.records())?;
        let bootstraps_path = self.out_folder.join(format!("{}_bootstraps.csv", plan.out_name));
        write_bootstraps(&bootstraps_path, &exported)?;

        println!(
            "✅ Aggregated {} features over {} bootstraps written to: {}",
            aggregate.snps.len(),
            n_bootstraps,
            final_path.display()
        );
        Ok(aggregate)
    }
}

/// One `bootstrap_<n>` column per sample, shorter columns padded with NA
fn write_bootstraps(path: &Path, bootstraps: &[Vec<i64>]) -> Result<()> {
    let mut headers = vec![String::new()];
    headers.extend((1..=bootstraps.len()).map(|i| format!("bootstrap_{}", i)));

    let depth = bootstraps.iter().map(|b| b.len()).max().unwrap_or(0);
    let records = (0..depth).map(|row| {
        let mut record = vec![row.to_string()];
        record.extend(bootstraps.iter().map(|b| {
            b.get(row)
                .map_or_else(|| MISSING_VALUE.to_string(), |id| id.to_string())
        }));
        record
    });
    write_table(path, "csv", &headers, records)?;
    Ok(())
}
