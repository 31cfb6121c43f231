//! Error types for portfolio analytics

use thiserror::Error;

/// Errors that can occur when constructing or querying a portfolio
#[derive(Error, Debug)]
pub enum Error {
    /// Construction-time validation failure. The message names the violated
    /// check (cardinality mismatch, missing asset, zero-sum weights, ...) so
    /// the caller can correct inputs without re-deriving which one failed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A benchmark-relative metric could not be computed (empty date
    /// overlap, zero benchmark variance, zero beta). Recoverable: the
    /// summary boundary substitutes a default instead of propagating.
    #[error("Benchmark unavailable: {0}")]
    BenchmarkUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
