// dataset.rs - Numeric feature matrix with participant IDs and class target

use crate::data::read_table;
use crate::data::table::{is_missing, TableFormat};
use crate::error::{PrepError, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Column-major numeric dataset used by the selectors.
///
/// Missing feature cells are NaN. The target is an integer class label.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id_column: String,
    pub target_column: String,
    pub ids: Vec<i64>,
    pub target: Vec<i64>,
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<f64>>,
}

impl Dataset {
    /// Load from a compiled CSV.
    ///
    /// Every column other than the ID, the target, unnamed index columns and
    /// `drop` becomes a feature.
    pub fn from_csv(
        path: &Path,
        id_column: &str,
        target_column: &str,
        drop: &[String],
    ) -> Result<Self> {
        let table = read_table(path, Some(TableFormat::from_path(path)))?;
        let id_idx = table.find_id_column(Some(id_column), &[])?;
        let target_idx = table.column_index(target_column).ok_or_else(|| {
            PrepError::schema(path, format!("target column '{}' not found", target_column))
        })?;

        let drop: HashSet<&str> = drop.iter().map(|s| s.as_str()).collect();
        let feature_idx: Vec<usize> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(i, h)| {
                *i != id_idx && *i != target_idx && !h.is_empty() && !drop.contains(h.as_str())
            })
            .map(|(i, _)| i)
            .collect();

        let mut ids = Vec::with_capacity(table.len());
        let mut target = Vec::with_capacity(table.len());
        let mut features = vec![Vec::with_capacity(table.len()); feature_idx.len()];

        for row in 0..table.len() {
            ids.push(table.participant_id(row, id_idx)?);

            let raw = &table.rows[row][target_idx];
            let label = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.fract() == 0.0)
                .ok_or_else(|| {
                    PrepError::parse(
                        path,
                        table.lines[row],
                        format!("target '{}' is not an integer class label", raw),
                    )
                })?;
            target.push(label as i64);

            for (col, &idx) in feature_idx.iter().enumerate() {
                let cell = &table.rows[row][idx];
                let value = if is_missing(cell) {
                    f64::NAN
                } else {
                    cell.trim().parse::<f64>().map_err(|_| {
                        PrepError::parse(
                            path,
                            table.lines[row],
                            format!(
                                "'{}' in column '{}' is not numeric",
                                cell, table.headers[idx]
                            ),
                        )
                    })?
                };
                features[col].push(value);
            }
        }

        let dataset = Self {
            id_column: id_column.to_string(),
            target_column: target_column.to_string(),
            ids,
            target,
            feature_names: feature_idx.iter().map(|&i| table.headers[i].clone()).collect(),
            features,
        };

        println!(
            "📊 Selection dataset: {} participants × {} features (target '{}', {} classes)",
            dataset.len(),
            dataset.n_features(),
            target_column,
            dataset.classes().len()
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Sorted distinct class labels
    pub fn classes(&self) -> Vec<i64> {
        let mut classes: Vec<i64> = self.target.clone();
        classes.sort_unstable();
        classes.dedup();
        classes
    }

    /// Row index of each participant (first occurrence)
    pub fn id_index(&self) -> HashMap<i64, usize> {
        let mut index = HashMap::with_capacity(self.len());
        for (row, id) in self.ids.iter().enumerate() {
            index.entry(*id).or_insert(row);
        }
        index
    }

    /// Materialize the given rows (repetitions allowed) as a new dataset
    pub fn subset(&self, rows: &[usize]) -> Self {
        Self {
            id_column: self.id_column.clone(),
            target_column: self.target_column.clone(),
            ids: rows.iter().map(|&r| self.ids[r]).collect(),
            target: rows.iter().map(|&r| self.target[r]).collect(),
            feature_names: self.feature_names.clone(),
            features: self
                .features
                .iter()
                .map(|col| rows.iter().map(|&r| col[r]).collect())
                .collect(),
        }
    }

    /// Sum of a feature column ignoring missing cells
    pub fn frequency(&self, feature: usize) -> f64 {
        self.features[feature].iter().filter(|v| !v.is_nan()).sum()
    }
}
