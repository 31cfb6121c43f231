//! # portfolio-analytics: performance and risk metrics for asset baskets
//!
//! Computes standardized performance and risk metrics for a weighted
//! basket of assets from historical daily return series. A [`Portfolio`]
//! is constructed once from weights, asset identifiers, and a return
//! table, then queried as an immutable snapshot; every metric is a pure,
//! deterministic read, so a portfolio can be shared across threads freely.
//!
//! ## Modules
//!
//! - `series`: date-indexed return containers and labeled covariance input
//! - `stats`: statistics primitives (moments, quantiles, shape statistics)
//! - `risk`: volatility, VaR/CVaR, drawdown, diversification ratio
//! - `performance`: annualized return and the risk-adjusted ratio family
//! - `portfolio`: the `Portfolio` aggregate tying it all together
//! - `error`: error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use portfolio_analytics::{Portfolio, ReturnTable};
//!
//! let dates: Vec<NaiveDate> = (0..4)
//!     .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i))
//!     .collect();
//!
//! let returns = ReturnTable::from_columns(
//!     dates,
//!     vec![
//!         ("AAA".to_string(), vec![0.010, -0.020, 0.015, 0.000]),
//!         ("BBB".to_string(), vec![0.005, 0.005, 0.005, 0.005]),
//!     ],
//! )
//! .unwrap();
//!
//! let portfolio = Portfolio::new(
//!     vec![1.0, 1.0],
//!     vec!["AAA".to_string(), "BBB".to_string()],
//!     returns,
//! )
//! .unwrap();
//!
//! let summary = portfolio.risk_summary();
//! assert!(summary.max_drawdown <= 0.0);
//! assert!(summary.cvar_95 <= summary.var_95);
//! ```

mod error;
mod series;
mod stats;
mod risk;
mod performance;
mod portfolio;

pub use error::{Error, Result};
pub use performance::{
    beta, calmar_ratio, expected_return, information_ratio, performance_summary, sharpe_ratio,
    sortino_ratio, treynor_ratio, PerformanceSummary,
};
pub use portfolio::Portfolio;
pub use risk::{
    conditional_value_at_risk, cumulative_returns, diversification_ratio, drawdown_series,
    max_drawdown, portfolio_returns, risk_summary, value_at_risk, volatility, RiskSummary,
    TRADING_DAYS,
};
pub use series::{CovarianceMatrix, ReturnSeries, ReturnTable};
pub use stats::{downside_deviation, excess_kurtosis, quantile, sample_covariance, skewness};
