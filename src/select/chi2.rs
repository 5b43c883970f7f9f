// chi2.rs - Chi-square test of non-negative features against class labels

use super::dataset::Dataset;
use super::stats::chi2_sf;
use super::traits::{FeatureSelector, SelectionResult, SelectorParams};
use crate::error::{PrepError, Result};
use rayon::prelude::*;

/// Per-class feature sums compared with their expectation under independence
pub struct Chi2Selector;

/// Chi-square statistic and p-value for one feature column
pub fn chi2_statistic(feature: &[f64], target: &[i64], classes: &[i64]) -> (f64, f64) {
    if feature.iter().any(|v| v.is_nan()) {
        return (f64::NAN, f64::NAN);
    }

    let n = target.len() as f64;
    let total: f64 = feature.iter().sum();

    let mut score = 0.0;
    for &class in classes {
        let mut observed = 0.0;
        let mut members = 0usize;
        for (v, t) in feature.iter().zip(target) {
            if *t == class {
                observed += v;
                members += 1;
            }
        }
        let expected = total * members as f64 / n;
        // 0/0 for an all-zero feature propagates NaN
        score += (observed - expected).powi(2) / expected;
    }

    let df = (classes.len() - 1) as f64;
    (score, chi2_sf(score, df))
}

impl FeatureSelector for Chi2Selector {
    fn name(&self) -> &'static str {
        "chi2"
    }

    fn description(&self) -> &'static str {
        "Chi-square statistic of feature sums per class (non-negative features)"
    }

    fn select(&self, data: &Dataset, _params: &SelectorParams) -> Result<SelectionResult> {
        let classes = data.classes();
        if classes.len() < 2 {
            return Err(PrepError::selection(format!(
                "chi2 needs at least two classes in '{}'",
                data.target_column
            )));
        }

        if let Some((name, _)) = data
            .feature_names
            .iter()
            .zip(&data.features)
            .find(|(_, col)| col.iter().any(|v| *v < 0.0))
        {
            return Err(PrepError::selection(format!(
                "chi2 requires non-negative features; '{}' has negative values",
                name
            )));
        }

        let rows: Vec<(String, Vec<f64>)> = (0..data.n_features())
            .into_par_iter()
            .map(|i| {
                let (score, p) = chi2_statistic(&data.features[i], &data.target, &classes);
                (
                    data.feature_names[i].clone(),
                    vec![score, p, data.frequency(i)],
                )
            })
            .collect();

        let mut result = SelectionResult {
            selector: self.name().to_string(),
            columns: vec![
                "chi2_score".to_string(),
                "p_val".to_string(),
                "frequency".to_string(),
            ],
            rows,
            score_column: 0,
        };
        result.sort_by_column(0, true);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::dataset::tests::dataset;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_binary_statistic() {
        let (score, p) = chi2_statistic(&[1.0, 1.0, 0.0, 0.0], &[0, 0, 1, 1], &[0, 1]);
        assert!(close(score, 2.0));
        assert!(close(p, 0.157_299_207_050_285_13));
    }

    #[test]
    fn test_three_class_statistic() {
        let (score, p) = chi2_statistic(
            &[2.0, 1.0, 0.0, 1.0, 0.0, 3.0],
            &[0, 0, 1, 1, 2, 2],
            &[0, 1, 2],
        );
        assert!(close(score, 1.142_857_142_857_142_8));
        assert!(close(p, 0.564_718_122_007_759_3));
    }

    #[test]
    fn test_all_zero_feature_is_nan() {
        let (score, p) = chi2_statistic(&[0.0, 0.0, 0.0], &[0, 1, 1], &[0, 1]);
        assert!(score.is_nan());
        assert!(p.is_nan());
    }

    #[test]
    fn test_select_sorts_descending() {
        let data = dataset(
            &[0, 0, 1, 1],
            &[
                ("rs_weak", &[1.0, 0.0, 1.0, 0.0]),
                ("rs_strong", &[1.0, 1.0, 0.0, 0.0]),
            ],
        );
        let result = Chi2Selector.select(&data, &SelectorParams::new()).unwrap();

        assert_eq!(result.headers(), vec!["SNP", "chi2_score", "p_val", "frequency"]);
        assert_eq!(result.rows[0].0, "rs_strong");
        assert_eq!(result.rows[0].1[2], 2.0);
        assert_eq!(result.score_name(), "chi2_score");
    }

    #[test]
    fn test_rejects_negative_features() {
        let data = dataset(&[0, 1], &[("rs1", &[-1.0, 1.0])]);
        assert!(Chi2Selector.select(&data, &SelectorParams::new()).is_err());
    }

    #[test]
    fn test_rejects_single_class() {
        let data = dataset(&[1, 1], &[("rs1", &[0.0, 1.0])]);
        assert!(Chi2Selector.select(&data, &SelectorParams::new()).is_err());
    }
}
