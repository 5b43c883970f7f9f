// infogain.rs - Mutual information between discrete features and the class

use super::dataset::Dataset;
use super::stats::{mutual_information, value_key};
use super::traits::{FeatureSelector, SelectionResult, SelectorParams};
use crate::error::Result;
use rayon::prelude::*;

/// Information gain in nats, computed on the rows where the feature is present
pub struct InfoGainSelector;

pub fn information_gain(feature: &[f64], target: &[i64]) -> f64 {
    let (x, y): (Vec<u64>, Vec<u64>) = feature
        .iter()
        .zip(target)
        .filter(|(v, _)| !v.is_nan())
        .map(|(v, t)| (value_key(*v), *t as u64))
        .unzip();

    if x.is_empty() {
        return f64::NAN;
    }
    mutual_information(&x, &y, std::f64::consts::E)
}

impl FeatureSelector for InfoGainSelector {
    fn name(&self) -> &'static str {
        "infogain"
    }

    fn description(&self) -> &'static str {
        "Mutual information (nats) between discrete feature values and class"
    }

    fn select(&self, data: &Dataset, _params: &SelectorParams) -> Result<SelectionResult> {
        let rows: Vec<(String, Vec<f64>)> = (0..data.n_features())
            .into_par_iter()
            .map(|i| {
                (
                    data.feature_names[i].clone(),
                    vec![
                        information_gain(&data.features[i], &data.target),
                        data.frequency(i),
                    ],
                )
            })
            .collect();

        let mut result = SelectionResult {
            selector: self.name().to_string(),
            columns: vec!["infogain_score".to_string(), "frequency".to_string()],
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

    #[test]
    fn test_information_gain() {
        let gain = information_gain(&[0.0, 0.0, 1.0, 1.0], &[0, 0, 1, 1]);
        assert!((gain - 2f64.ln()).abs() < 1e-12);

        let none = information_gain(&[0.0, 1.0, 0.0, 1.0], &[0, 0, 1, 1]);
        assert!(none.abs() < 1e-12);
    }

    #[test]
    fn test_missing_cells_are_skipped() {
        let gain = information_gain(&[0.0, f64::NAN, 1.0, 1.0], &[0, 0, 1, 1]);
        assert!((gain - (3f64.ln() - 2.0 / 3.0 * 2f64.ln())).abs() < 1e-12);
        assert!(information_gain(&[f64::NAN], &[1]).is_nan());
    }

    #[test]
    fn test_select_orders_by_gain() {
        let data = dataset(
            &[0, 0, 1, 1],
            &[
                ("rs_noise", &[0.0, 1.0, 0.0, 1.0]),
                ("rs_signal", &[0.0, 0.0, 2.0, 2.0]),
            ],
        );
        let result = InfoGainSelector.select(&data, &SelectorParams::new()).unwrap();
        assert_eq!(result.rows[0].0, "rs_signal");
        assert_eq!(result.rows[0].1[1], 4.0);
        assert_eq!(result.headers(), vec!["SNP", "infogain_score", "frequency"]);
    }
}
