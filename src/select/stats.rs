// stats.rs - Distribution tails and information-theoretic estimators

use std::collections::HashMap;
use std::hash::Hash;

const EPS: f64 = 1e-15;
const MAX_ITER: usize = 500;
const TINY: f64 = 1e-300;

/// ln Γ(x) for x > 0 (Lanczos, g = 7)
pub fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut a = COEF[0];
    let t = x + 7.5;
    for (i, c) in COEF.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

/// Regularized upper incomplete gamma Q(a, x)
pub fn gamma_q(a: f64, x: f64) -> f64 {
    if x.is_nan() || a.is_nan() || a <= 0.0 || x < 0.0 {
        return f64::NAN;
    }
    if x == 0.0 {
        return 1.0;
    }
    if x.is_infinite() {
        return 0.0;
    }

    if x < a + 1.0 {
        1.0 - gamma_p_series(a, x)
    } else {
        gamma_q_continued_fraction(a, x)
    }
}

fn gamma_p_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut sum = 1.0 / a;
    let mut del = sum;
    for _ in 0..MAX_ITER {
        ap += 1.0;
        del *= x / ap;
        sum += del;
        if del.abs() < sum.abs() * EPS {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

fn gamma_q_continued_fraction(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=MAX_ITER {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + an / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}

/// Survival function of the chi-square distribution
pub fn chi2_sf(x: f64, df: f64) -> f64 {
    if df <= 0.0 || x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    gamma_q(df / 2.0, x / 2.0)
}

/// Survival function of the standard normal distribution
pub fn normal_sf(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    // erfc(t) = Q(1/2, t^2)
    let tail = 0.5 * gamma_q(0.5, z * z / 2.0);
    if z >= 0.0 {
        tail
    } else {
        1.0 - tail
    }
}

/// Canonical hashable key for a numeric cell (NaN is one category, -0 == 0)
pub fn value_key(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Plug-in entropy of a sequence of discrete symbols, in the given log base
pub fn entropy<K, I>(symbols: I, base: f64) -> f64
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    let mut n = 0usize;
    for s in symbols {
        *counts.entry(s).or_insert(0) += 1;
        n += 1;
    }
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    let h: f64 = counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.ln()
        })
        .sum();
    h / base.ln()
}

/// I(X; Y) = H(X) + H(Y) - H(X, Y)
pub fn mutual_information(x: &[u64], y: &[u64], base: f64) -> f64 {
    let hx = entropy(x.iter().copied(), base);
    let hy = entropy(y.iter().copied(), base);
    let hxy = entropy(x.iter().zip(y).map(|(a, b)| (*a, *b)), base);
    (hx + hy - hxy).max(0.0)
}

/// I(X; Y | Z) = H(X, Z) + H(Y, Z) - H(X, Y, Z) - H(Z)
pub fn conditional_mutual_information(x: &[u64], y: &[u64], z: &[u64], base: f64) -> f64 {
    let hxz = entropy(x.iter().zip(z).map(|(a, c)| (*a, *c)), base);
    let hyz = entropy(y.iter().zip(z).map(|(b, c)| (*b, *c)), base);
    let hxyz = entropy(
        x.iter().zip(y).zip(z).map(|((a, b), c)| (*a, *b, *c)),
        base,
    );
    let hz = entropy(z.iter().copied(), base);
    (hxz + hyz - hxyz - hz).max(0.0)
}

/// Average ranks (1-based) with ties sharing their mean rank
pub fn rank_average(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }
    ranks
}

/// Sizes of each group of tied values
pub fn tie_counts(values: &[f64]) -> Vec<usize> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for &v in values {
        *counts.entry(value_key(v)).or_insert(0) += 1;
    }
    counts.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    #[test]
    fn test_ln_gamma() {
        assert!(close(ln_gamma(1.0), 0.0, 1e-12));
        assert!(close(ln_gamma(5.0), 24f64.ln(), 1e-12));
        assert!(close(ln_gamma(0.5), std::f64::consts::PI.sqrt().ln(), 1e-12));
    }

    #[test]
    fn test_chi2_sf() {
        assert!(close(chi2_sf(2.0, 1.0), 0.157_299_207_050_285_13, 1e-9));
        assert!(close(chi2_sf(10.5, 3.0), 0.014_760_897_143_990_672, 1e-9));
        assert!(close(chi2_sf(0.3, 4.0), 0.989_814_172_888_816_5, 1e-9));
        assert!(close(chi2_sf(30.0, 4.0), 4.894_437_128_029_212_6e-6, 1e-7));
        assert_eq!(chi2_sf(0.0, 2.0), 1.0);
        assert!(chi2_sf(1.0, 0.0).is_nan());
    }

    #[test]
    fn test_normal_sf() {
        assert!(close(normal_sf(1.2345), 0.108_508_323_362_670_2, 1e-9));
        assert!(close(normal_sf(-0.7), 0.758_036_347_776_927, 1e-9));
        assert!(close(normal_sf(0.0), 0.5, 1e-12));
    }

    #[test]
    fn test_mutual_information() {
        let y = [0, 0, 1, 1];
        assert!(close(mutual_information(&[0, 0, 1, 1], &y, 2.0), 1.0, 1e-12));
        assert!(close(mutual_information(&[0, 1, 0, 1], &y, 2.0), 0.0, 1e-12));
        assert!(close(
            mutual_information(&[0, 0, 1, 1], &y, std::f64::consts::E),
            2f64.ln(),
            1e-12
        ));
    }

    #[test]
    fn test_conditional_mutual_information() {
        // x = y XOR z: independent of y alone, fully informative given z
        let y = [0, 0, 1, 1];
        let z = [0, 1, 0, 1];
        let x = [0, 1, 1, 0];
        assert!(close(mutual_information(&x, &y, 2.0), 0.0, 1e-12));
        assert!(close(conditional_mutual_information(&x, &y, &z, 2.0), 1.0, 1e-12));
    }

    #[test]
    fn test_rank_average_with_ties() {
        assert_eq!(rank_average(&[3.0, 1.0, 3.0, 2.0]), vec![3.5, 1.0, 3.5, 2.0]);
        let mut ties = tie_counts(&[1.0, 1.0, 2.0, 0.0, -0.0]);
        ties.sort();
        assert_eq!(ties, vec![1, 2, 2]);
    }
}
