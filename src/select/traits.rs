// traits.rs - Selector trait and per-run result table

use super::dataset::Dataset;
use crate::error::{PrepError, Result};
use std::collections::HashMap;

/// Extra options passed to a selector, e.g. `n_selected_features=20`
pub type SelectorParams = HashMap<String, String>;

/// Parse `key=value,key=value` into selector params
pub fn parse_params(params: &str) -> SelectorParams {
    let mut parsed = HashMap::new();

    if params.trim().is_empty() {
        return parsed;
    }

    for pair in params.split(',') {
        let parts: Vec<&str> = pair.split('=').collect();
        if parts.len() == 2 {
            parsed.insert(parts[0].trim().to_string(), parts[1].trim().to_string());
        }
    }

    parsed
}

/// Read an optional positive integer param
pub fn usize_param(params: &SelectorParams, key: &str) -> Result<Option<usize>> {
    match params.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .map(Some)
            .ok_or_else(|| {
                PrepError::selection(format!("{} must be a positive integer, got '{}'", key, raw))
            }),
    }
}

/// Scores for every feature from one selector run
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    pub selector: String,
    /// Statistic column names, excluding the leading `SNP` column
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<f64>)>,
    /// Index into `columns` of the score aggregated across bootstraps
    pub score_column: usize,
}

impl SelectionResult {
    pub fn score_name(&self) -> &str {
        &self.columns[self.score_column]
    }

    pub fn scores(&self) -> HashMap<&str, f64> {
        self.rows
            .iter()
            .map(|(snp, values)| (snp.as_str(), values[self.score_column]))
            .collect()
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["SNP".to_string()];
        headers.extend(self.columns.iter().cloned());
        headers
    }

    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(|(snp, values)| {
            let mut record = vec![snp.clone()];
            record.extend(values.iter().map(|v| format_number(*v)));
            record
        })
    }

    /// Order rows by a statistic; NaN always sorts last
    pub fn sort_by_column(&mut self, column: usize, descending: bool) {
        self.rows.sort_by(|a, b| {
            let (x, y) = (a.1[column], b.1[column]);
            match (x.is_nan(), y.is_nan()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                _ if descending => y.total_cmp(&x),
                _ => x.total_cmp(&y),
            }
        });
    }
}

/// Integers without a trailing `.0`, NaN and infinities spelled out
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Trait for pluggable feature selection methods
pub trait FeatureSelector: Send + Sync {
    /// Registry name, also used in output file names
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Score every feature of `data` against its target
    fn select(&self, data: &Dataset, params: &SelectorParams) -> Result<SelectionResult>;
}
