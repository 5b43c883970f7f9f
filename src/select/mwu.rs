// mwu.rs - Mann-Whitney U of target values between carriers and non-carriers

use super::dataset::Dataset;
use super::stats::{normal_sf, rank_average, tie_counts};
use super::traits::{FeatureSelector, SelectionResult, SelectorParams};
use crate::error::Result;
use rayon::prelude::*;

/// Compares target values of rows with feature == 0 against feature == 1
pub struct MannWhitneySelector;

/// (U of x vs y, U of y vs x, two-sided p-value)
///
/// Normal approximation with tie and continuity correction. An empty group
/// gives infinite U and NaN p.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> (f64, f64, f64) {
    let (n1, n2) = (x.len(), y.len());
    if n1 == 0 || n2 == 0 {
        return (f64::INFINITY, f64::INFINITY, f64::NAN);
    }

    let combined: Vec<f64> = x.iter().chain(y).copied().collect();
    let ranks = rank_average(&combined);
    let r1: f64 = ranks[..n1].iter().sum();

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let u1 = r1 - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;

    let n = n1f + n2f;
    let tie_term: f64 = tie_counts(&combined)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let sigma = (n1f * n2f / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)))).sqrt();

    let p = if sigma > 0.0 {
        let z = (u1.max(u2) - n1f * n2f / 2.0 - 0.5) / sigma;
        (2.0 * normal_sf(z)).min(1.0)
    } else {
        1.0
    };

    (u1, u2, p)
}

impl FeatureSelector for MannWhitneySelector {
    fn name(&self) -> &'static str {
        "mwu"
    }

    fn description(&self) -> &'static str {
        "Mann-Whitney U of target values between feature == 0 and feature == 1"
    }

    fn select(&self, data: &Dataset, _params: &SelectorParams) -> Result<SelectionResult> {
        let rows: Vec<(String, Vec<f64>)> = (0..data.n_features())
            .into_par_iter()
            .map(|i| {
                let feature = &data.features[i];
                let zeros: Vec<f64> = feature
                    .iter()
                    .zip(&data.target)
                    .filter(|(v, _)| **v == 0.0)
                    .map(|(_, t)| *t as f64)
                    .collect();
                let ones: Vec<f64> = feature
                    .iter()
                    .zip(&data.target)
                    .filter(|(v, _)| **v == 1.0)
                    .map(|(_, t)| *t as f64)
                    .collect();

                let (u1, u2, p) = mann_whitney_u(&zeros, &ones);
                (
                    data.feature_names[i].clone(),
                    vec![u1, u2, u1.min(u2), p, data.frequency(i)],
                )
            })
            .collect();

        let mut result = SelectionResult {
            selector: self.name().to_string(),
            columns: vec![
                "mwu_1".to_string(),
                "mwu_2".to_string(),
                "u_min".to_string(),
                "p_val".to_string(),
                "frequency".to_string(),
            ],
            rows,
            score_column: 2,
        };
        result.sort_by_column(2, false);
        Ok(result)
    }
}
