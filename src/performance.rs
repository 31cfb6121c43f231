//! Performance metric calculations
//!
//! Annualized return and the risk-adjusted ratio family (Sharpe, Sortino,
//! Calmar, Information Ratio, Treynor). Free functions, like the risk
//! module; the `Portfolio` aggregate forwards into them.
//!
//! Degenerate denominators (zero volatility, empty downside tail, zero
//! drawdown) yield 0 rather than an error. Benchmark-relative metrics
//! return `Error::BenchmarkUnavailable`, which `performance_summary`
//! converts to a logged 0 so a bad benchmark never blocks core metrics.

use crate::error::{Error, Result};
use crate::risk::{self, TRADING_DAYS};
use crate::series::ReturnSeries;
use crate::stats;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Annualized expected return: weighted sum of per-asset mean periodic
/// returns, scaled by 252.
pub fn expected_return(weights: &DVector<f64>, returns: &DMatrix<f64>) -> f64 {
    let means = DVector::from_iterator(
        returns.ncols(),
        returns.column_iter().map(|col| col.mean()),
    );
    weights.dot(&means) * TRADING_DAYS
}

/// Sharpe ratio: excess annualized return per unit of total volatility.
/// Exactly 0 when volatility is 0.
pub fn sharpe_ratio(annualized_return: f64, volatility: f64, risk_free_rate: f64) -> f64 {
    if volatility == 0.0 {
        return 0.0;
    }
    (annualized_return - risk_free_rate) / volatility
}

/// Sortino ratio: excess annualized return per unit of downside deviation.
///
/// Downside deviation is taken over periods where the portfolio return
/// falls below the daily risk-free threshold (`risk_free_rate / 252`) and
/// annualized by sqrt(252). 0 when the downside tail is empty.
pub fn sortino_ratio(
    portfolio_returns: &[f64],
    annualized_return: f64,
    risk_free_rate: f64,
) -> f64 {
    let daily_threshold = risk_free_rate / TRADING_DAYS;
    let downside_dev =
        stats::downside_deviation(portfolio_returns, daily_threshold) * TRADING_DAYS.sqrt();

    if downside_dev == 0.0 {
        return 0.0;
    }
    (annualized_return - risk_free_rate) / downside_dev
}

/// Calmar ratio: excess annualized return over absolute maximum drawdown.
/// 0 when maximum drawdown is exactly 0 (nothing to normalize against).
pub fn calmar_ratio(
    portfolio_returns: &[f64],
    annualized_return: f64,
    risk_free_rate: f64,
) -> f64 {
    let max_dd = risk::max_drawdown(portfolio_returns).abs();
    if max_dd == 0.0 {
        return 0.0;
    }
    (annualized_return - risk_free_rate) / max_dd
}

/// Beta of aligned portfolio returns against benchmark returns:
/// cov(portfolio, benchmark) / var(benchmark).
pub fn beta(portfolio_returns: &[f64], benchmark_returns: &[f64]) -> Result<f64> {
    if portfolio_returns.len() != benchmark_returns.len() || portfolio_returns.len() < 2 {
        return Err(Error::BenchmarkUnavailable(
            "need at least 2 aligned observations for beta".to_string(),
        ));
    }

    let benchmark_variance = stats::sample_covariance(benchmark_returns, benchmark_returns);
    if benchmark_variance == 0.0 {
        return Err(Error::BenchmarkUnavailable(
            "benchmark variance is zero".to_string(),
        ));
    }

    Ok(stats::sample_covariance(portfolio_returns, benchmark_returns) / benchmark_variance)
}

/// Information ratio: mean active return over its standard deviation,
/// annualized by sqrt(252). Active returns are computed over the date
/// intersection of the two series.
pub fn information_ratio(
    portfolio: &ReturnSeries,
    benchmark: &ReturnSeries,
) -> Result<f64> {
    let (port, bench) = portfolio.align(benchmark);
    if port.len() < 2 {
        return Err(Error::BenchmarkUnavailable(format!(
            "only {} overlapping periods with the benchmark",
            port.len()
        )));
    }

    let active: Vec<f64> = port.iter().zip(&bench).map(|(p, b)| p - b).collect();
    let active_std = stats::sample_std(&active);
    if active_std == 0.0 {
        return Err(Error::BenchmarkUnavailable(
            "active returns have zero dispersion".to_string(),
        ));
    }

    Ok(stats::mean(&active) / active_std * TRADING_DAYS.sqrt())
}

/// Treynor ratio: excess annualized return over beta against the benchmark.
pub fn treynor_ratio(
    portfolio: &ReturnSeries,
    benchmark: &ReturnSeries,
    annualized_return: f64,
    risk_free_rate: f64,
) -> Result<f64> {
    let (port, bench) = portfolio.align(benchmark);
    let portfolio_beta = beta(&port, &bench)?;
    if portfolio_beta == 0.0 {
        return Err(Error::BenchmarkUnavailable(
            "portfolio beta is zero".to_string(),
        ));
    }

    Ok((annualized_return - risk_free_rate) / portfolio_beta)
}

/// Performance metrics bundle for downstream consumers
///
/// The benchmark-relative fields are `None` when no benchmark was
/// available, and `Some(0.0)` when a benchmark was supplied but either
/// metric failed (partial-failure policy, logged as a warning).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Annualized expected return
    pub annualized_return: f64,

    /// Sharpe ratio
    pub sharpe: f64,

    /// Sortino ratio
    pub sortino: f64,

    /// Calmar ratio
    pub calmar: f64,

    /// Information ratio against the benchmark, if one was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information_ratio: Option<f64>,

    /// Treynor ratio against the benchmark, if one was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treynor: Option<f64>,
}

fn benchmark_metrics(
    portfolio: &ReturnSeries,
    benchmark: &ReturnSeries,
    annualized_return: f64,
    risk_free_rate: f64,
) -> Result<(f64, f64)> {
    let ir = information_ratio(portfolio, benchmark)?;
    let treynor = treynor_ratio(portfolio, benchmark, annualized_return, risk_free_rate)?;
    Ok((ir, treynor))
}

/// Compute the full performance summary from portfolio fields.
///
/// Benchmark metrics are attempted only when `benchmark` is present; any
/// failure computing them is caught here, logged, and replaced by 0 for
/// both so the core metrics are unaffected.
pub fn performance_summary(
    weights: &DVector<f64>,
    returns: &DMatrix<f64>,
    cov_matrix: &DMatrix<f64>,
    portfolio_series: &ReturnSeries,
    benchmark: Option<&ReturnSeries>,
    risk_free_rate: f64,
) -> PerformanceSummary {
    let annualized_return = expected_return(weights, returns);
    let volatility = risk::volatility(weights, cov_matrix);
    let series = portfolio_series.values();

    let mut summary = PerformanceSummary {
        annualized_return,
        sharpe: sharpe_ratio(annualized_return, volatility, risk_free_rate),
        sortino: sortino_ratio(series, annualized_return, risk_free_rate),
        calmar: calmar_ratio(series, annualized_return, risk_free_rate),
        information_ratio: None,
        treynor: None,
    };

    if let Some(bench) = benchmark {
        match benchmark_metrics(portfolio_series, bench, annualized_return, risk_free_rate) {
            Ok((ir, treynor)) => {
                summary.information_ratio = Some(ir);
                summary.treynor = Some(treynor);
            }
            Err(e) => {
                warn!("could not compute benchmark metrics, defaulting to 0: {}", e);
                summary.information_ratio = Some(0.0);
                summary.treynor = Some(0.0);
            }
        }
    }

    summary
}
