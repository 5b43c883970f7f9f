// lcsi.rs - Greedy conditional-likelihood selection (mRMR and JMI)

use super::dataset::Dataset;
use super::stats::{conditional_mutual_information, mutual_information, value_key};
use super::traits::{usize_param, FeatureSelector, SelectionResult, SelectorParams};
use crate::error::Result;
use rayon::prelude::*;

/// Redundancy and conditional-relevance weights of the LCSI criterion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criterion {
    /// beta = 1/|S|, gamma = 0
    Mrmr,
    /// beta = gamma = 1/|S|
    Jmi,
}

impl Criterion {
    fn weights(&self, selected: usize) -> (f64, f64) {
        let w = 1.0 / selected as f64;
        match self {
            Criterion::Mrmr => (w, 0.0),
            Criterion::Jmi => (w, w),
        }
    }
}

/// Order in which features were picked, with the criterion value at each pick
#[derive(Debug, Clone, PartialEq)]
pub struct LcsiSelection {
    pub order: Vec<usize>,
    pub scores: Vec<f64>,
}

/// Greedy forward selection maximising
/// `I(f;y) - beta * sum I(f;s) + gamma * sum I(f;s|y)` over selected `s`.
///
/// Without `n_selected` the search stops once the best candidate scores
/// below zero; that candidate is still kept.
pub fn lcsi(
    features: &[Vec<u64>],
    target: &[u64],
    criterion: Criterion,
    n_selected: Option<usize>,
) -> LcsiSelection {
    let n_features = features.len();
    let mut selection = LcsiSelection {
        order: Vec::new(),
        scores: Vec::new(),
    };
    if n_features == 0 {
        return selection;
    }

    let relevance: Vec<f64> = features
        .par_iter()
        .map(|f| mutual_information(f, target, 2.0))
        .collect();
    let mut redundancy = vec![0.0; n_features];
    let mut conditional = vec![0.0; n_features];
    let mut chosen = vec![false; n_features];

    let mut best = 0;
    for (i, r) in relevance.iter().enumerate() {
        if *r > relevance[best] {
            best = i;
        }
    }
    chosen[best] = true;
    selection.order.push(best);
    selection.scores.push(relevance[best]);
    let mut last = best;
    let mut last_score = relevance[best];

    loop {
        let done = match n_selected {
            Some(n) => selection.order.len() >= n,
            None => last_score < 0.0,
        };
        if done || selection.order.len() == n_features {
            break;
        }

        let (beta, gamma) = criterion.weights(selection.order.len());
        let latest = &features[last];
        let updates: Vec<(usize, f64, f64)> = (0..n_features)
            .into_par_iter()
            .filter(|i| !chosen[*i])
            .map(|i| {
                (
                    i,
                    mutual_information(latest, &features[i], 2.0),
                    conditional_mutual_information(latest, &features[i], target, 2.0),
                )
            })
            .collect();

        let mut pick = None;
        let mut pick_score = f64::NEG_INFINITY;
        for (i, mi, cmi) in updates {
            redundancy[i] += mi;
            conditional[i] += cmi;
            let score = relevance[i] - beta * redundancy[i] + gamma * conditional[i];
            if score > pick_score {
                pick_score = score;
                pick = Some(i);
            }
        }

        let Some(i) = pick else { break };
        chosen[i] = true;
        selection.order.push(i);
        selection.scores.push(pick_score);
        last = i;
        last_score = pick_score;
    }

    selection
}

/// Shared body of the two LCSI selectors: 1 for picked features, 0 otherwise
fn run_lcsi(
    name: &'static str,
    criterion: Criterion,
    data: &Dataset,
    params: &SelectorParams,
) -> Result<SelectionResult> {
    let n_selected = usize_param(params, "n_selected_features")?;

    let features: Vec<Vec<u64>> = data
        .features
        .iter()
        .map(|col| col.iter().map(|v| value_key(*v)).collect())
        .collect();
    let target: Vec<u64> = data.target.iter().map(|t| *t as u64).collect();

    let picked = lcsi(&features, &target, criterion, n_selected);
    let picked_names: Vec<&str> = picked
        .order
        .iter()
        .map(|&i| data.feature_names[i].as_str())
        .collect();
    tracing::debug!(selector = name, picked = ?picked_names, "LCSI selection");

    let mut flags = vec![0.0; data.n_features()];
    for &i in &picked.order {
        flags[i] = 1.0;
    }

    Ok(SelectionResult {
        selector: name.to_string(),
        columns: vec![format!("{}_score", name)],
        rows: data
            .feature_names
            .iter()
            .cloned()
            .zip(flags.into_iter().map(|f| vec![f]))
            .collect(),
        score_column: 0,
    })
}

/// Minimum redundancy, maximum relevance
pub struct MrmrSelector;

impl FeatureSelector for MrmrSelector {
    fn name(&self) -> &'static str {
        "mrmr"
    }

    fn description(&self) -> &'static str {
        "Greedy mRMR subset (param n_selected_features)"
    }

    fn select(&self, data: &Dataset, params: &SelectorParams) -> Result<SelectionResult> {
        run_lcsi(self.name(), Criterion::Mrmr, data, params)
    }
}

/// Joint mutual information
pub struct JmiSelector;

impl FeatureSelector for JmiSelector {
    fn name(&self) -> &'static str {
        "jmi"
    }

    fn description(&self) -> &'static str {
        "Greedy joint mutual information subset (param n_selected_features)"
    }

    fn select(&self, data: &Dataset, params: &SelectorParams) -> Result<SelectionResult> {
        run_lcsi(self.name(), Criterion::Jmi, data, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::dataset::tests::dataset;
    use crate::select::traits::parse_params;

    const TARGET: [u64; 8] = [0, 0, 0, 0, 1, 1, 1, 1];
    const SIGNAL: [u64; 8] = [0, 0, 0, 1, 1, 1, 1, 1];

    fn columns(cols: &[[u64; 8]]) -> Vec<Vec<u64>> {
        cols.iter().map(|c| c.to_vec()).collect()
    }

    #[test]
    fn test_duplicate_is_redundant() {
        let features = columns(&[
            SIGNAL,
            SIGNAL,
            [0, 1, 0, 0, 1, 0, 1, 1],
            [0, 0, 1, 1, 0, 0, 1, 1],
        ]);

        let mrmr = lcsi(&features, &TARGET, Criterion::Mrmr, Some(2));
        assert_eq!(mrmr.order, vec![0, 2]);
        assert!((mrmr.scores[0] - 0.548_794_940_695_398_7).abs() < 1e-9);
        assert!((mrmr.scores[1] - 0.139_926_934_845_468_36).abs() < 1e-9);

        let jmi = lcsi(&features, &TARGET, Criterion::Jmi, Some(2));
        assert_eq!(jmi.order, vec![0, 2]);
        assert!((jmi.scores[1] - 0.201_205_059_304_601_75).abs() < 1e-9);
    }

    #[test]
    fn test_mrmr_stops_after_negative_pick() {
        let inverted: [u64; 8] = [1, 1, 1, 0, 0, 0, 0, 0];
        let features = columns(&[SIGNAL, SIGNAL, SIGNAL, [0, 0, 1, 1, 0, 0, 1, 1], inverted]);

        let mrmr = lcsi(&features, &TARGET, Criterion::Mrmr, None);
        assert_eq!(mrmr.order, vec![0, 3]);
        assert!(mrmr.scores[1] < 0.0);

        let jmi = lcsi(&features, &TARGET, Criterion::Jmi, None);
        assert_eq!(jmi.order.len(), 5);
    }

    #[test]
    fn test_no_features() {
        let picked = lcsi(&[], &TARGET, Criterion::Jmi, Some(3));
        assert!(picked.order.is_empty());
    }

    #[test]
    fn test_selector_flags_keep_column_order() {
        let data = dataset(
            &[0, 0, 0, 0, 1, 1, 1, 1],
            &[
                ("rs1", &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
                ("rs1_copy", &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
                ("rs2", &[0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0]),
            ],
        );
        let params = parse_params("n_selected_features=2");

        let result = MrmrSelector.select(&data, &params).unwrap();
        assert_eq!(result.headers(), vec!["SNP", "mrmr_score"]);
        let flags: Vec<(&str, f64)> = result
            .rows
            .iter()
            .map(|(s, v)| (s.as_str(), v[0]))
            .collect();
        assert_eq!(flags, vec![("rs1", 1.0), ("rs1_copy", 0.0), ("rs2", 1.0)]);

        assert!(JmiSelector.select(&data, &parse_params("n_selected_features=0")).is_err());
    }
}
