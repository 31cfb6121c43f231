//! Portfolio analytics walkthrough
//!
//! Builds a three-asset portfolio from simulated daily returns and prints
//! the full performance and risk report, plus the JSON payload a
//! downstream dashboard would receive.
//!
//! Run with: cargo run --example portfolio_report

use chrono::NaiveDate;
use portfolio_analytics::{Portfolio, ReturnSeries, ReturnTable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Portfolio Analytics Report ===\n");

    let n = 252;
    let dates: Vec<NaiveDate> = (0..n)
        .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64))
        .collect();

    // Simulated daily returns: moderate, high, and low volatility with
    // mixed correlation
    let spy: Vec<f64> = (0..n)
        .map(|i| (i as f64 * 0.05).sin() * 0.015 + ((i * 7) % 100) as f64 / 10000.0)
        .collect();
    let qqq: Vec<f64> = (0..n)
        .map(|i| (i as f64 * 0.05).sin() * 0.020 + ((i * 11) % 100) as f64 / 8000.0)
        .collect();
    let tlt: Vec<f64> = (0..n)
        .map(|i| -(i as f64 * 0.05).sin() * 0.008 + ((i * 13) % 100) as f64 / 15000.0)
        .collect();

    // Benchmark tracking the broad market
    let market: Vec<f64> = (0..n)
        .map(|i| (i as f64 * 0.05).sin() * 0.012 + ((i * 5) % 100) as f64 / 12000.0)
        .collect();
    let benchmark = ReturnSeries::new(dates.clone(), market)?;

    let returns = ReturnTable::from_columns(
        dates,
        vec![
            ("SPY".to_string(), spy),
            ("QQQ".to_string(), qqq),
            ("TLT".to_string(), tlt),
        ],
    )?;

    let portfolio = Portfolio::new(
        vec![0.50, 0.30, 0.20],
        vec!["SPY".to_string(), "QQQ".to_string(), "TLT".to_string()],
        returns,
    )?
    .with_risk_free_rate(0.02)
    .with_market_returns(benchmark);

    println!("{}\n", portfolio);

    println!("--- Weights ---");
    for (asset, weight) in portfolio.weights_by_asset() {
        println!("  {}: {:.1}%", asset, weight * 100.0);
    }
    println!();

    println!("--- Performance ---");
    let performance = portfolio.performance_summary(None, 0.02);
    println!("  Annualized return: {:>8.2}%", performance.annualized_return * 100.0);
    println!("  Sharpe:            {:>8.2}", performance.sharpe);
    println!("  Sortino:           {:>8.2}", performance.sortino);
    println!("  Calmar:            {:>8.2}", performance.calmar);
    if let Some(ir) = performance.information_ratio {
        println!("  Information ratio: {:>8.2}", ir);
    }
    if let Some(treynor) = performance.treynor {
        println!("  Treynor:           {:>8.2}", treynor);
    }
    println!();

    println!("--- Risk ---");
    let risk = portfolio.risk_summary();
    println!("  Volatility:        {:>8.2}%", risk.volatility * 100.0);
    println!("  VaR (95%):         {:>8.2}%", risk.var_95 * 100.0);
    println!("  CVaR (95%):        {:>8.2}%", risk.cvar_95 * 100.0);
    println!("  Max drawdown:      {:>8.2}%", risk.max_drawdown * 100.0);
    println!("  Diversification:   {:>8.2}", risk.diversification_ratio);
    println!("  Skewness:          {:>8.2}", risk.skewness);
    println!("  Excess kurtosis:   {:>8.2}", risk.kurtosis);
    println!();

    let drawdowns = portfolio.drawdown_series();
    let trough = drawdowns
        .values()
        .iter()
        .copied()
        .fold(0.0, f64::min);
    println!("Deepest drawdown over {} periods: {:.2}%", drawdowns.len(), trough * 100.0);
    println!();

    println!("--- Dashboard payload ---");
    println!("{}", serde_json::to_string_pretty(&risk)?);

    Ok(())
}
