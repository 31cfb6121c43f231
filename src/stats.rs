//! Statistics primitives over return slices
//!
//! Thin layer shared by the risk and performance modules: sample moments,
//! interpolated quantiles, and distribution shape statistics. Skewness and
//! excess kurtosis use the bias-corrected (pandas-compatible) estimators.

use statrs::statistics::Statistics;

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    Statistics::mean(xs)
}

/// Sample standard deviation (n-1 denominator), 0.0 for fewer than 2 values.
pub fn sample_std(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    Statistics::std_dev(xs)
}

/// Sample covariance of two equal-length slices (n-1 denominator).
///
/// Returns 0.0 for mismatched lengths or fewer than 2 observations.
pub fn sample_covariance(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    Statistics::covariance(xs, ys)
}

/// Empirical quantile with linear interpolation between order statistics
/// (numpy's default), `p` clamped to [0, 1]. Returns 0.0 for an empty slice.
pub fn quantile(xs: &[f64], p: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    }
}

/// Adjusted Fisher-Pearson skewness, matching pandas `Series.skew()`.
///
/// Returns 0.0 for fewer than 3 observations or zero dispersion.
pub fn skewness(xs: &[f64]) -> f64 {
    let n = xs.len();
    if n < 3 {
        return 0.0;
    }
    let nf = n as f64;
    let m = mean(xs);
    let m2 = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / nf;
    if m2 == 0.0 {
        return 0.0;
    }
    let m3 = xs.iter().map(|x| (x - m).powi(3)).sum::<f64>() / nf;
    let g1 = m3 / m2.powf(1.5);
    g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0)
}

/// Bias-corrected excess kurtosis, matching pandas `Series.kurtosis()`.
///
/// Returns 0.0 for fewer than 4 observations or zero dispersion.
pub fn excess_kurtosis(xs: &[f64]) -> f64 {
    let n = xs.len();
    if n < 4 {
        return 0.0;
    }
    let nf = n as f64;
    let m = mean(xs);
    let m2 = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / nf;
    if m2 == 0.0 {
        return 0.0;
    }
    let m4 = xs.iter().map(|x| (x - m).powi(4)).sum::<f64>() / nf;
    let g2 = m4 / (m2 * m2) - 3.0;
    ((nf + 1.0) * g2 + 6.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0))
}

/// Periodic downside deviation: root mean square of shortfalls below
/// `threshold`, averaged over the shortfall count only.
///
/// Returns 0.0 when no value falls below the threshold.
pub fn downside_deviation(xs: &[f64], threshold: f64) -> f64 {
    let shortfalls: Vec<f64> = xs
        .iter()
        .filter(|&&r| r < threshold)
        .map(|&r| r - threshold)
        .collect();

    if shortfalls.is_empty() {
        return 0.0;
    }

    let variance = shortfalls.iter().map(|s| s * s).sum::<f64>() / shortfalls.len() as f64;
    variance.sqrt()
}
