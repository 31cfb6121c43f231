//! Portfolio aggregate
//!
//! Binds a normalized weight vector, asset identifiers, return history,
//! and a covariance matrix into one immutable snapshot, and exposes every
//! metric as a read-only method forwarding into the `performance` and
//! `risk` free functions. Construction validates and normalizes; nothing
//! mutates afterwards, so metric calls are deterministic and safe to run
//! concurrently.

use crate::error::{Error, Result};
use crate::performance::{self, PerformanceSummary};
use crate::risk::{self, RiskSummary};
use crate::series::{CovarianceMatrix, ReturnSeries, ReturnTable};
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use std::fmt;

// Weight sums below this are treated as zero and rejected.
const WEIGHT_SUM_EPS: f64 = 1e-12;

/// Immutable weighted basket of assets with historical returns
#[derive(Debug, Clone)]
pub struct Portfolio {
    weights: DVector<f64>,
    assets: Vec<String>,
    returns: ReturnTable,
    cov_matrix: DMatrix<f64>,
    risk_free_rate: f64,
    market_returns: Option<ReturnSeries>,
}

impl Portfolio {
    /// Construct a portfolio from weights, asset identifiers, and return
    /// history.
    ///
    /// Weights are normalized to sum to 1; the return table is restricted
    /// and reordered to exactly `assets` (extra columns are dropped); the
    /// covariance matrix is derived as the sample covariance of the
    /// restricted returns unless later replaced via [`with_cov_matrix`].
    ///
    /// Fails with [`Error::InvalidInput`] on weight/asset cardinality
    /// mismatch, duplicate assets, an asset missing from the return data,
    /// empty return history, or a zero-sum weight vector. The original
    /// system divided by the weight sum unguarded; rejecting zero here is
    /// deliberate.
    ///
    /// [`with_cov_matrix`]: Portfolio::with_cov_matrix
    pub fn new(weights: Vec<f64>, assets: Vec<String>, returns: ReturnTable) -> Result<Self> {
        if weights.len() != assets.len() {
            return Err(Error::InvalidInput(format!(
                "{} weights supplied for {} assets",
                weights.len(),
                assets.len()
            )));
        }
        if let Some(dup) = (1..assets.len()).find(|&i| assets[..i].contains(&assets[i])) {
            return Err(Error::InvalidInput(format!(
                "duplicate asset '{}'",
                assets[dup]
            )));
        }
        if returns.num_periods() == 0 {
            return Err(Error::InvalidInput(
                "return history is empty".to_string(),
            ));
        }

        let restricted = returns.select(&assets)?;

        let weight_sum: f64 = weights.iter().sum();
        if weight_sum.abs() < WEIGHT_SUM_EPS {
            return Err(Error::InvalidInput(
                "weights sum to zero and cannot be normalized".to_string(),
            ));
        }
        let weights = DVector::from_vec(weights) / weight_sum;

        let cov_matrix = restricted.sample_covariance();

        Ok(Self {
            weights,
            assets,
            returns: restricted,
            cov_matrix,
            risk_free_rate: 0.0,
            market_returns: None,
        })
    }

    /// Set the annualized risk-free rate used by [`Display`] and as the
    /// default threshold for summaries.
    ///
    /// [`Display`]: fmt::Display
    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Attach a benchmark return series, used by `performance_summary`
    /// when no explicit benchmark argument is given.
    pub fn with_market_returns(mut self, market_returns: ReturnSeries) -> Self {
        self.market_returns = Some(market_returns);
        self
    }

    /// Replace the derived covariance matrix with a supplied one,
    /// restricted and reordered to this portfolio's assets.
    ///
    /// Fails with [`Error::InvalidInput`] when the matrix lacks any asset.
    pub fn with_cov_matrix(mut self, cov_matrix: &CovarianceMatrix) -> Result<Self> {
        self.cov_matrix = cov_matrix.restrict(&self.assets)?;
        Ok(self)
    }

    pub fn weights(&self) -> &[f64] {
        self.weights.as_slice()
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn returns(&self) -> &ReturnTable {
        &self.returns
    }

    pub fn cov_matrix(&self) -> &DMatrix<f64> {
        &self.cov_matrix
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn market_returns(&self) -> Option<&ReturnSeries> {
        self.market_returns.as_ref()
    }

    /// Normalized weight per asset identifier.
    pub fn weights_by_asset(&self) -> HashMap<String, f64> {
        self.assets
            .iter()
            .cloned()
            .zip(self.weights.iter().copied())
            .collect()
    }

    /// Periodic portfolio return series: weighted sum across assets.
    pub fn portfolio_returns(&self) -> ReturnSeries {
        ReturnSeries::from_parts(
            self.returns.dates().to_vec(),
            risk::portfolio_returns(&self.weights, self.returns.data()),
        )
    }

    fn portfolio_return_values(&self) -> Vec<f64> {
        risk::portfolio_returns(&self.weights, self.returns.data())
    }

    /// Annualized expected return.
    pub fn expected_return(&self) -> f64 {
        performance::expected_return(&self.weights, self.returns.data())
    }

    /// Annualized portfolio volatility.
    pub fn volatility(&self) -> f64 {
        risk::volatility(&self.weights, &self.cov_matrix)
    }

    /// Sharpe ratio; 0 when volatility is 0.
    pub fn sharpe_ratio(&self, risk_free_rate: f64) -> f64 {
        performance::sharpe_ratio(self.expected_return(), self.volatility(), risk_free_rate)
    }

    /// Sortino ratio; 0 when the downside tail is empty.
    pub fn sortino_ratio(&self, risk_free_rate: f64) -> f64 {
        performance::sortino_ratio(
            &self.portfolio_return_values(),
            self.expected_return(),
            risk_free_rate,
        )
    }

    /// Calmar ratio; 0 when maximum drawdown is 0.
    pub fn calmar_ratio(&self, risk_free_rate: f64) -> f64 {
        performance::calmar_ratio(
            &self.portfolio_return_values(),
            self.expected_return(),
            risk_free_rate,
        )
    }

    /// Information ratio against a benchmark series.
    pub fn information_ratio(&self, benchmark: &ReturnSeries) -> Result<f64> {
        performance::information_ratio(&self.portfolio_returns(), benchmark)
    }

    /// Treynor ratio against a benchmark series.
    pub fn treynor_ratio(&self, benchmark: &ReturnSeries, risk_free_rate: f64) -> Result<f64> {
        performance::treynor_ratio(
            &self.portfolio_returns(),
            benchmark,
            self.expected_return(),
            risk_free_rate,
        )
    }

    /// Performance summary: return, Sharpe, Sortino, Calmar, and (when a
    /// benchmark is available) Information Ratio and Treynor.
    ///
    /// Falls back to the stored market returns when `benchmark` is `None`.
    /// Benchmark-metric failures are logged and reported as 0 rather than
    /// propagated.
    pub fn performance_summary(
        &self,
        benchmark: Option<&ReturnSeries>,
        risk_free_rate: f64,
    ) -> PerformanceSummary {
        let bench = benchmark.or(self.market_returns.as_ref());
        performance::performance_summary(
            &self.weights,
            self.returns.data(),
            &self.cov_matrix,
            &self.portfolio_returns(),
            bench,
            risk_free_rate,
        )
    }

    /// Historical VaR as a signed periodic return.
    ///
    /// Fails with [`Error::InvalidInput`] unless `confidence_level` is
    /// strictly between 0 and 1.
    pub fn value_at_risk(&self, confidence_level: f64) -> Result<f64> {
        validate_confidence(confidence_level)?;
        Ok(risk::value_at_risk(
            &self.portfolio_return_values(),
            confidence_level,
        ))
    }

    /// Conditional VaR (expected shortfall) as a signed periodic return.
    pub fn conditional_value_at_risk(&self, confidence_level: f64) -> Result<f64> {
        validate_confidence(confidence_level)?;
        Ok(risk::conditional_value_at_risk(
            &self.portfolio_return_values(),
            confidence_level,
        ))
    }

    /// Cumulative return path, cumprod(1 + r) - 1.
    pub fn cumulative_returns(&self) -> ReturnSeries {
        ReturnSeries::from_parts(
            self.returns.dates().to_vec(),
            risk::cumulative_returns(&self.portfolio_return_values()),
        )
    }

    /// Drawdown path from the running peak of cumulative wealth; <= 0.
    pub fn drawdown_series(&self) -> ReturnSeries {
        ReturnSeries::from_parts(
            self.returns.dates().to_vec(),
            risk::drawdown_series(&self.portfolio_return_values()),
        )
    }

    /// Maximum drawdown; <= 0.
    pub fn max_drawdown(&self) -> f64 {
        risk::max_drawdown(&self.portfolio_return_values())
    }

    /// Diversification ratio; 0 when portfolio volatility is 0.
    pub fn diversification_ratio(&self) -> f64 {
        risk::diversification_ratio(&self.weights, &self.cov_matrix)
    }

    /// Risk summary: volatility, 95% VaR/CVaR, max drawdown,
    /// diversification ratio, and distribution shape statistics.
    pub fn risk_summary(&self) -> RiskSummary {
        risk::risk_summary(&self.weights, self.returns.data(), &self.cov_matrix)
    }
}

fn validate_confidence(confidence_level: f64) -> Result<()> {
    if confidence_level <= 0.0 || confidence_level >= 1.0 {
        return Err(Error::InvalidInput(format!(
            "confidence level {} must be strictly between 0 and 1",
            confidence_level
        )));
    }
    Ok(())
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Portfolio(assets={}, return={:.2}%, risk={:.2}%, sharpe={:.2})",
            self.assets.len(),
            self.expected_return() * 100.0,
            self.volatility() * 100.0,
            self.sharpe_ratio(self.risk_free_rate)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| {
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
            })
            .collect()
    }

    fn two_asset_table() -> ReturnTable {
        ReturnTable::from_columns(
            dates(4),
            vec![
                ("A".to_string(), vec![0.01, -0.02, 0.015, 0.0]),
                ("B".to_string(), vec![0.005, 0.005, 0.005, 0.005]),
            ],
        )
        .unwrap()
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_weights_normalized() {
        let portfolio =
            Portfolio::new(vec![1.0, 1.0], names(&["A", "B"]), two_asset_table()).unwrap();

        let sum: f64 = portfolio.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((portfolio.weights()[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cardinality_mismatch_rejected() {
        let result = Portfolio::new(vec![1.0], names(&["A", "B"]), two_asset_table());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_missing_asset_rejected() {
        let result = Portfolio::new(vec![0.5, 0.5], names(&["A", "Z"]), two_asset_table());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_asset_rejected() {
        let result = Portfolio::new(vec![0.5, 0.5], names(&["A", "A"]), two_asset_table());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_zero_sum_weights_rejected() {
        let result = Portfolio::new(vec![0.5, -0.5], names(&["A", "B"]), two_asset_table());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_extra_columns_dropped() {
        let table = ReturnTable::from_columns(
            dates(3),
            vec![
                ("A".to_string(), vec![0.01, 0.02, 0.03]),
                ("B".to_string(), vec![0.02, 0.01, 0.00]),
                ("C".to_string(), vec![0.03, 0.00, 0.01]),
            ],
        )
        .unwrap();

        let portfolio = Portfolio::new(vec![0.3, 0.7], names(&["C", "A"]), table).unwrap();
        assert_eq!(portfolio.returns().columns(), &names(&["C", "A"]));
        assert_eq!(portfolio.cov_matrix().nrows(), 2);
    }

    #[test]
    fn test_supplied_cov_matrix_restricted() {
        let cov = CovarianceMatrix::new(
            names(&["B", "A", "X"]),
            DMatrix::from_row_slice(
                3,
                3,
                &[0.0004, 0.0001, 0.0, 0.0001, 0.0009, 0.0, 0.0, 0.0, 0.0016],
            ),
        )
        .unwrap();

        let portfolio = Portfolio::new(vec![0.5, 0.5], names(&["A", "B"]), two_asset_table())
            .unwrap()
            .with_cov_matrix(&cov)
            .unwrap();

        // Reordered to (A, B): var(A) = 0.0009, var(B) = 0.0004
        assert!((portfolio.cov_matrix()[(0, 0)] - 0.0009).abs() < 1e-15);
        assert!((portfolio.cov_matrix()[(1, 1)] - 0.0004).abs() < 1e-15);
    }

    #[test]
    fn test_supplied_cov_matrix_missing_asset() {
        let cov = CovarianceMatrix::new(
            names(&["A"]),
            DMatrix::from_row_slice(1, 1, &[0.0004]),
        )
        .unwrap();

        let result = Portfolio::new(vec![0.5, 0.5], names(&["A", "B"]), two_asset_table())
            .unwrap()
            .with_cov_matrix(&cov);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_empty_history_rejected() {
        let table = ReturnTable::from_columns(
            vec![],
            vec![("A".to_string(), vec![]), ("B".to_string(), vec![])],
        )
        .unwrap();

        let result = Portfolio::new(vec![0.5, 0.5], names(&["A", "B"]), table);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_weights_by_asset() {
        let portfolio =
            Portfolio::new(vec![3.0, 1.0], names(&["A", "B"]), two_asset_table()).unwrap();

        let by_asset = portfolio.weights_by_asset();
        assert!((by_asset["A"] - 0.75).abs() < 1e-12);
        assert!((by_asset["B"] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_level_validated() {
        let portfolio =
            Portfolio::new(vec![0.5, 0.5], names(&["A", "B"]), two_asset_table()).unwrap();

        assert!(portfolio.value_at_risk(0.0).is_err());
        assert!(portfolio.value_at_risk(1.0).is_err());
        assert!(portfolio.conditional_value_at_risk(1.5).is_err());
        assert!(portfolio.value_at_risk(0.95).is_ok());
    }

    #[test]
    fn test_portfolio_returns_dated() {
        let portfolio =
            Portfolio::new(vec![0.5, 0.5], names(&["A", "B"]), two_asset_table()).unwrap();

        let series = portfolio.portfolio_returns();
        assert_eq!(series.len(), 4);
        assert_eq!(series.dates(), portfolio.returns().dates());
        assert!((series.values()[0] - 0.0075).abs() < 1e-12);
    }

    #[test]
    fn test_display_format() {
        let portfolio =
            Portfolio::new(vec![0.5, 0.5], names(&["A", "B"]), two_asset_table()).unwrap();

        let rendered = format!("{}", portfolio);
        assert!(rendered.starts_with("Portfolio(assets=2, return="));
        assert!(rendered.contains("sharpe="));
    }
}
