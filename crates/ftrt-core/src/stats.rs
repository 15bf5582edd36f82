//! Descriptive statistics and correlation primitives
//!
//! Pearson and Spearman coefficients with a two-tailed Student's t p-value and
//! a Fisher z confidence interval. Distribution functions come from `statrs`.

use crate::errors::{CorrelationError, Series};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Minimum number of pairs for a correlation with a defined p-value
pub const MIN_CORRELATION_PAIRS: usize = 3;

/// Arithmetic mean; `None` for an empty slice
pub fn mean(x: &[f64]) -> Option<f64> {
    if x.is_empty() {
        return None;
    }
    Some(x.iter().sum::<f64>() / x.len() as f64)
}

/// Sample variance (n - 1 denominator); `None` for fewer than two values
pub fn variance(x: &[f64]) -> Option<f64> {
    if x.len() < 2 {
        return None;
    }
    let m = mean(x)?;
    let ss: f64 = x
        .iter()
        .map(|v| {
            let d = v - m;
            d * d
        })
        .sum();
    Some(ss / (x.len() - 1) as f64)
}

/// Sample standard deviation
pub fn standard_deviation(x: &[f64]) -> Option<f64> {
    variance(x).map(f64::sqrt)
}

/// Percentile `p` (0-100) with linear interpolation between closest ranks
///
/// Matches the common "linear" definition: position `p/100 * (n - 1)` in the
/// sorted data.
pub fn percentile(x: &[f64], p: f64) -> Option<f64> {
    if x.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    let mut sorted = x.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// 1-based ranks with ties assigned their average rank
pub fn rank(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && x[order[j + 1]] == x[order[i]] {
            j += 1;
        }
        // positions i..=j share the mean of ranks (i+1)..=(j+1)
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }

    ranks
}

/// Pearson product-moment correlation coefficient
///
/// # Errors
///
/// - `LengthMismatch` if `x` and `y` differ in length
/// - `InsufficientData` for fewer than three pairs
/// - `ZeroVariance` if either series is constant (FTRT is `x`, solar is `y`)
/// - `NonFiniteValue` if either series holds NaN or an infinity
///
/// Each series is divided by its largest magnitude first, so the sums of
/// squares stay finite for values anywhere in the `f64` range.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, CorrelationError> {
    check_pairs(x, y)?;

    let x = unit_scaled(x, Series::Ftrt)?;
    let y = unit_scaled(y, Series::Solar)?;

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(&y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 {
        return Err(CorrelationError::ZeroVariance {
            series: Series::Ftrt,
        });
    }
    if var_y == 0.0 {
        return Err(CorrelationError::ZeroVariance {
            series: Series::Solar,
        });
    }

    Ok((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Divide by the largest magnitude; constant input is rejected up front
fn unit_scaled(values: &[f64], series: Series) -> Result<Vec<f64>, CorrelationError> {
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(CorrelationError::NonFiniteValue { series, index });
    }
    if values.windows(2).all(|w| w[0] == w[1]) {
        return Err(CorrelationError::ZeroVariance { series });
    }
    let scale = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    Ok(values.iter().map(|v| v / scale).collect())
}

/// Spearman rank correlation (Pearson on average ranks)
pub fn spearman(x: &[f64], y: &[f64]) -> Result<f64, CorrelationError> {
    check_pairs(x, y)?;
    pearson(&rank(x), &rank(y))
}

fn check_pairs(x: &[f64], y: &[f64]) -> Result<(), CorrelationError> {
    if x.len() != y.len() {
        return Err(CorrelationError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < MIN_CORRELATION_PAIRS {
        return Err(CorrelationError::InsufficientData {
            required: MIN_CORRELATION_PAIRS,
            actual: x.len(),
        });
    }
    Ok(())
}

/// Two-tailed p-value for H0: ρ = 0
///
/// Uses `t = r * sqrt((n - 2) / (1 - r²))` against Student's t with `n - 2`
/// degrees of freedom. A perfect correlation yields 0.
pub fn p_value(r: f64, n: usize) -> Result<f64, CorrelationError> {
    if n < MIN_CORRELATION_PAIRS {
        return Err(CorrelationError::InsufficientData {
            required: MIN_CORRELATION_PAIRS,
            actual: n,
        });
    }

    let r_sq = r * r;
    if r_sq >= 1.0 {
        return Ok(0.0);
    }

    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r_sq)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| CorrelationError::Distribution(e.to_string()))?;

    let p = 2.0 * (1.0 - dist.cdf(t.abs()));
    Ok(p.clamp(0.0, 1.0))
}

/// Fisher z-transform confidence interval for a correlation coefficient
///
/// Returns `None` when `n <= 3` or `level` is not strictly between 0 and 1.
pub fn fisher_confidence_interval(r: f64, n: usize, level: f64) -> Option<(f64, f64)> {
    if n <= 3 || !(level > 0.0 && level < 1.0) {
        return None;
    }

    let standard_normal = Normal::new(0.0, 1.0).ok()?;
    let z_crit = standard_normal.inverse_cdf(1.0 - (1.0 - level) / 2.0);
    let z = r.clamp(-1.0, 1.0).atanh();
    let se = 1.0 / ((n - 3) as f64).sqrt();

    Some(((z - z_crit * se).tanh(), (z + z_crit * se).tanh()))
}
