//! Two-sided Mann-Whitney rank-sum test
//!
//! Normal approximation with midranks and the tie correction. Degenerate
//! input (an empty sample, or zero rank variance because every pooled value
//! is identical) is an error: a meaningless test statistic must not come
//! back looking like a result.

use serde::{Deserialize, Serialize};
use tethys_core::{TethysError, TethysResult};

/// Result of a two-sided rank-sum comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankSumTest {
    pub n1: usize,
    pub n2: usize,
    /// Mann-Whitney U statistic of the first sample
    pub u: f64,
    /// Standardized statistic under the null
    pub z: f64,
    /// Two-sided p-value from the normal approximation
    pub p_value: f64,
}

/// Compare two samples with the two-sided Mann-Whitney U test
pub fn rank_sum_test(a: &[f64], b: &[f64]) -> TethysResult<RankSumTest> {
    if a.is_empty() || b.is_empty() {
        return Err(TethysError::Statistics(format!(
            "rank-sum test needs two non-empty samples (got {} and {})",
            a.len(),
            b.len()
        )));
    }

    let n1 = a.len();
    let n2 = b.len();
    let n = n1 + n2;

    // Pool and rank with midranks for ties
    let mut pooled: Vec<(f64, usize)> = a
        .iter()
        .map(|&v| (v, 0usize))
        .chain(b.iter().map(|&v| (v, 1usize)))
        .collect();
    pooled.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut rank_sum_a = 0.0f64;
    let mut tie_term = 0.0f64;
    let mut i = 0usize;
    while i < n {
        let mut j = i;
        while j + 1 < n && pooled[j + 1].0 == pooled[i].0 {
            j += 1;
        }
        // Ranks i+1 ..= j+1 share the midrank
        let midrank = (i + 1 + j + 1) as f64 / 2.0;
        let t = (j - i + 1) as f64;
        if t > 1.0 {
            tie_term += t * t * t - t;
        }
        for item in &pooled[i..=j] {
            if item.1 == 0 {
                rank_sum_a += midrank;
            }
        }
        i = j + 1;
    }

    let u = rank_sum_a - (n1 * (n1 + 1)) as f64 / 2.0;
    let mean_u = (n1 * n2) as f64 / 2.0;

    let nf = n as f64;
    let variance =
        (n1 * n2) as f64 / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)));
    if variance <= 0.0 {
        return Err(TethysError::Statistics(
            "rank-sum test is degenerate: all pooled values are identical".to_string(),
        ));
    }

    let z = (u - mean_u) / variance.sqrt();
    let p_value = 2.0 * (1.0 - standard_normal_cdf(z.abs()));

    Ok(RankSumTest {
        n1,
        n2,
        u,
        z,
        p_value,
    })
}

/// Standard normal CDF via the Abramowitz-Stegun erf approximation
/// (maximum absolute error ~1.5e-7)
fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const P: f64 = 0.327_591_1;
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}
