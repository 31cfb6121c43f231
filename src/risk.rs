//! Risk metric calculations
//!
//! Free functions over weight vectors, return matrices, and covariance
//! matrices, so each metric stays independently testable; the `Portfolio`
//! aggregate forwards its immutable fields into these.
//!
//! Sign convention: VaR and CVaR are reported as signed periodic returns,
//! so a loss is negative and CVaR <= VaR.

use crate::stats;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Trading periods assumed per year when annualizing periodic statistics.
pub const TRADING_DAYS: f64 = 252.0;

/// Periodic portfolio return series: weighted sum across assets, one value
/// per time period.
pub fn portfolio_returns(weights: &DVector<f64>, returns: &DMatrix<f64>) -> Vec<f64> {
    (returns * weights).iter().copied().collect()
}

/// Annualized portfolio volatility: sqrt(w' (Sigma * 252) w).
///
/// The variance form is clamped at zero before the square root; a sample
/// covariance matrix is positive semi-definite, so a negative value can
/// only come from floating-point noise or a bad user-supplied matrix.
pub fn volatility(weights: &DVector<f64>, cov_matrix: &DMatrix<f64>) -> f64 {
    let variance = (weights.transpose() * (cov_matrix * TRADING_DAYS) * weights)[(0, 0)];
    variance.max(0.0).sqrt()
}

/// Historical Value-at-Risk: the empirical quantile of the portfolio
/// return series at tail probability `1 - confidence_level`, as a signed
/// periodic return.
pub fn value_at_risk(portfolio_returns: &[f64], confidence_level: f64) -> f64 {
    stats::quantile(portfolio_returns, 1.0 - confidence_level)
}

/// Conditional Value-at-Risk (expected shortfall): mean of all returns at
/// or below the VaR threshold.
pub fn conditional_value_at_risk(portfolio_returns: &[f64], confidence_level: f64) -> f64 {
    let threshold = value_at_risk(portfolio_returns, confidence_level);
    let tail: Vec<f64> = portfolio_returns
        .iter()
        .copied()
        .filter(|r| *r <= threshold)
        .collect();
    stats::mean(&tail)
}

/// Cumulative return path: cumprod(1 + r) - 1, one value per period.
pub fn cumulative_returns(portfolio_returns: &[f64]) -> Vec<f64> {
    let mut wealth = 1.0;
    portfolio_returns
        .iter()
        .map(|r| {
            wealth *= 1.0 + r;
            wealth - 1.0
        })
        .collect()
}

/// Drawdown path: fractional decline of cumulative wealth from its running
/// peak, `(wealth[t] - peak[t]) / peak[t]`, with wealth seeded from 1.0.
/// Every value is <= 0.
pub fn drawdown_series(portfolio_returns: &[f64]) -> Vec<f64> {
    let mut wealth = 1.0;
    let mut peak = 1.0;
    portfolio_returns
        .iter()
        .map(|r| {
            wealth *= 1.0 + r;
            if wealth > peak {
                peak = wealth;
            }
            (wealth - peak) / peak
        })
        .collect()
}

/// Maximum drawdown: the most negative value of the drawdown path, <= 0.
pub fn max_drawdown(portfolio_returns: &[f64]) -> f64 {
    drawdown_series(portfolio_returns)
        .into_iter()
        .fold(0.0, f64::min)
}

/// Diversification ratio: weighted sum of individual annualized asset
/// volatilities over total portfolio volatility. >= 1 for any multi-asset
/// portfolio with imperfect correlation; 0 when portfolio volatility is 0.
pub fn diversification_ratio(weights: &DVector<f64>, cov_matrix: &DMatrix<f64>) -> f64 {
    let portfolio_vol = volatility(weights, cov_matrix);
    if portfolio_vol == 0.0 {
        return 0.0;
    }

    let weighted_vol_sum: f64 = weights
        .iter()
        .enumerate()
        .map(|(i, w)| w * (cov_matrix[(i, i)] * TRADING_DAYS).max(0.0).sqrt())
        .sum();

    weighted_vol_sum / portfolio_vol
}

/// Risk metrics bundle for downstream consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Annualized portfolio volatility
    pub volatility: f64,

    /// Historical VaR at 95% confidence (signed periodic return)
    pub var_95: f64,

    /// Conditional VaR at 95% confidence (signed periodic return)
    pub cvar_95: f64,

    /// Maximum drawdown, <= 0
    pub max_drawdown: f64,

    /// Weighted-average asset volatility over portfolio volatility
    pub diversification_ratio: f64,

    /// Skewness of the periodic portfolio return distribution
    pub skewness: f64,

    /// Excess kurtosis of the periodic portfolio return distribution
    pub kurtosis: f64,
}

/// Compute the full risk summary from portfolio fields.
pub fn risk_summary(
    weights: &DVector<f64>,
    returns: &DMatrix<f64>,
    cov_matrix: &DMatrix<f64>,
) -> RiskSummary {
    let series = portfolio_returns(weights, returns);

    RiskSummary {
        volatility: volatility(weights, cov_matrix),
        var_95: value_at_risk(&series, 0.95),
        cvar_95: conditional_value_at_risk(&series, 0.95),
        max_drawdown: max_drawdown(&series),
        diversification_ratio: diversification_ratio(weights, cov_matrix),
        skewness: stats::skewness(&series),
        kurtosis: stats::excess_kurtosis(&series),
    }
}
