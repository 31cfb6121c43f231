//! Time-indexed return containers
//!
//! `ReturnSeries` holds a single date-indexed return series; `ReturnTable`
//! holds one column per asset over a shared date index. Both require a
//! strictly ascending index so benchmark alignment can inner-join two
//! series with a single merge pass. `CovarianceMatrix` carries an asset
//! label axis so an externally supplied matrix can be restricted and
//! reordered to a portfolio's asset list.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

fn validate_date_index(dates: &[NaiveDate]) -> Result<()> {
    if dates.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Error::InvalidInput(
            "date index must be strictly ascending".to_string(),
        ));
    }
    Ok(())
}

/// A single date-indexed series of periodic returns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Create a series from a strictly ascending date index and values of
    /// equal length.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(Error::InvalidInput(format!(
                "series has {} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        validate_date_index(&dates)?;
        Ok(Self { dates, values })
    }

    // Invariants already hold for derived series; skips revalidation.
    pub(crate) fn from_parts(dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        Self { dates, values }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Inner-join two series on their date indexes, returning the value
    /// pairs for dates present in both. A single merge pass over the
    /// ascending indexes.
    pub fn align(&self, other: &ReturnSeries) -> (Vec<f64>, Vec<f64>) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < self.dates.len() && j < other.dates.len() {
            match self.dates[i].cmp(&other.dates[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    left.push(self.values[i]);
                    right.push(other.values[j]);
                    i += 1;
                    j += 1;
                }
            }
        }

        (left, right)
    }
}

/// Date-indexed table of periodic returns, one column per asset
///
/// Backed by a column-major matrix so per-asset access and covariance
/// computation stay cheap. Column order is preserved and meaningful:
/// a portfolio restricts the table to its asset list in weight order.
#[derive(Debug, Clone)]
pub struct ReturnTable {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    data: DMatrix<f64>,
}

impl ReturnTable {
    /// Build a table from labeled columns sharing one date index.
    pub fn from_columns(
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self> {
        validate_date_index(&dates)?;

        let mut labels = Vec::with_capacity(columns.len());
        for (label, values) in &columns {
            if values.len() != dates.len() {
                return Err(Error::InvalidInput(format!(
                    "column '{}' has {} values but the date index has {}",
                    label,
                    values.len(),
                    dates.len()
                )));
            }
            if labels.contains(label) {
                return Err(Error::InvalidInput(format!(
                    "duplicate column '{}'",
                    label
                )));
            }
            labels.push(label.clone());
        }

        let nrows = dates.len();
        let ncols = columns.len();
        let data = DMatrix::from_fn(nrows, ncols, |i, j| columns[j].1[i]);

        Ok(Self {
            dates,
            columns: labels,
            data,
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_periods(&self) -> usize {
        self.data.nrows()
    }

    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Values of a single column as an owned snapshot.
    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == label)?;
        Some(self.data.column(idx).iter().copied().collect())
    }

    /// Restrict the table to `labels`, in that order. Fails when a label
    /// has no column.
    pub fn select(&self, labels: &[String]) -> Result<ReturnTable> {
        let mut indices = Vec::with_capacity(labels.len());
        for label in labels {
            let idx = self
                .columns
                .iter()
                .position(|c| c == label)
                .ok_or_else(|| {
                    Error::InvalidInput(format!("asset '{}' not found in return data", label))
                })?;
            indices.push(idx);
        }

        Ok(ReturnTable {
            dates: self.dates.clone(),
            columns: labels.to_vec(),
            data: self.data.select_columns(indices.iter()),
        })
    }

    /// Per-column mean periodic return.
    pub fn mean_returns(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.data.ncols(),
            self.data.column_iter().map(|col| col.mean()),
        )
    }

    /// Sample covariance matrix of the columns (n-1 denominator,
    /// pandas-`.cov()` compatible). Zero matrix for fewer than 2 periods.
    pub fn sample_covariance(&self) -> DMatrix<f64> {
        let n = self.data.nrows();
        let k = self.data.ncols();
        if n < 2 {
            return DMatrix::zeros(k, k);
        }

        let means = self.mean_returns();
        let mut centered = self.data.clone();
        for j in 0..k {
            let mut col = centered.column_mut(j);
            col.add_scalar_mut(-means[j]);
        }

        (centered.transpose() * centered) / (n as f64 - 1.0)
    }
}

/// Square covariance matrix with an asset label axis
#[derive(Debug, Clone)]
pub struct CovarianceMatrix {
    labels: Vec<String>,
    matrix: DMatrix<f64>,
}

impl CovarianceMatrix {
    pub fn new(labels: Vec<String>, matrix: DMatrix<f64>) -> Result<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(Error::InvalidInput(format!(
                "covariance matrix must be square, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        if matrix.nrows() != labels.len() {
            return Err(Error::InvalidInput(format!(
                "covariance matrix is {}x{} but has {} labels",
                matrix.nrows(),
                matrix.ncols(),
                labels.len()
            )));
        }
        if (1..labels.len()).any(|i| labels[..i].contains(&labels[i])) {
            return Err(Error::InvalidInput(
                "duplicate label in covariance matrix".to_string(),
            ));
        }
        Ok(Self { labels, matrix })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Extract the sub-matrix for `assets`, reordered to match. Fails when
    /// an asset is missing from the label axis.
    pub fn restrict(&self, assets: &[String]) -> Result<DMatrix<f64>> {
        let mut indices = Vec::with_capacity(assets.len());
        for asset in assets {
            let idx = self
                .labels
                .iter()
                .position(|l| l == asset)
                .ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "asset '{}' not found in covariance matrix",
                        asset
                    ))
                })?;
            indices.push(idx);
        }

        Ok(self
            .matrix
            .select_rows(indices.iter())
            .select_columns(indices.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| {
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
            })
            .collect()
    }

    #[test]
    fn test_series_length_mismatch() {
        let result = ReturnSeries::new(dates(3), vec![0.01, 0.02]);
        assert!(result.is_err());
    }

    #[test]
    fn test_series_rejects_unsorted_dates() {
        let mut ds = dates(3);
        ds.swap(0, 2);
        assert!(ReturnSeries::new(ds, vec![0.01, 0.02, 0.03]).is_err());
    }

    #[test]
    fn test_series_align_partial_overlap() {
        let a = ReturnSeries::new(dates(4), vec![0.01, 0.02, 0.03, 0.04]).unwrap();
        let b = ReturnSeries::new(dates(6)[2..].to_vec(), vec![0.1, 0.2, 0.3, 0.4]).unwrap();

        let (left, right) = a.align(&b);
        assert_eq!(left, vec![0.03, 0.04]);
        assert_eq!(right, vec![0.1, 0.2]);
    }

    #[test]
    fn test_table_construction_and_column_access() {
        let table = ReturnTable::from_columns(
            dates(3),
            vec![
                ("A".to_string(), vec![0.01, 0.02, 0.03]),
                ("B".to_string(), vec![0.04, 0.05, 0.06]),
            ],
        )
        .unwrap();

        assert_eq!(table.num_periods(), 3);
        assert_eq!(table.columns(), &["A".to_string(), "B".to_string()]);
        assert_eq!(table.column("B").unwrap(), vec![0.04, 0.05, 0.06]);
        assert!(table.column("C").is_none());
    }

    #[test]
    fn test_table_rejects_duplicate_columns() {
        let result = ReturnTable::from_columns(
            dates(2),
            vec![
                ("A".to_string(), vec![0.01, 0.02]),
                ("A".to_string(), vec![0.03, 0.04]),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_table_select_reorders() {
        let table = ReturnTable::from_columns(
            dates(2),
            vec![
                ("A".to_string(), vec![0.01, 0.02]),
                ("B".to_string(), vec![0.03, 0.04]),
                ("C".to_string(), vec![0.05, 0.06]),
            ],
        )
        .unwrap();

        let selected = table.select(&["C".to_string(), "A".to_string()]).unwrap();
        assert_eq!(selected.columns(), &["C".to_string(), "A".to_string()]);
        assert_eq!(selected.column("C").unwrap(), vec![0.05, 0.06]);
        assert_eq!(selected.column("A").unwrap(), vec![0.01, 0.02]);

        assert!(table.select(&["Z".to_string()]).is_err());
    }

    #[test]
    fn test_sample_covariance_known_values() {
        let table = ReturnTable::from_columns(
            dates(3),
            vec![
                ("A".to_string(), vec![1.0, 2.0, 3.0]),
                ("B".to_string(), vec![2.0, 4.0, 6.0]),
            ],
        )
        .unwrap();

        let cov = table.sample_covariance();
        // var(A) = 1, cov(A, B) = 2, var(B) = 4
        assert!((cov[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((cov[(0, 1)] - 2.0).abs() < 1e-12);
        assert!((cov[(1, 0)] - 2.0).abs() < 1e-12);
        assert!((cov[(1, 1)] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_covariance_matrix_restrict() {
        let cov = CovarianceMatrix::new(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            DMatrix::from_row_slice(
                3,
                3,
                &[1.0, 2.0, 3.0, 2.0, 4.0, 5.0, 3.0, 5.0, 6.0],
            ),
        )
        .unwrap();

        let restricted = cov.restrict(&["C".to_string(), "A".to_string()]).unwrap();
        assert_eq!(restricted.nrows(), 2);
        assert!((restricted[(0, 0)] - 6.0).abs() < 1e-12);
        assert!((restricted[(0, 1)] - 3.0).abs() < 1e-12);
        assert!((restricted[(1, 1)] - 1.0).abs() < 1e-12);

        assert!(cov.restrict(&["X".to_string()]).is_err());
    }

    #[test]
    fn test_covariance_matrix_rejects_bad_shapes() {
        assert!(CovarianceMatrix::new(
            vec!["A".to_string()],
            DMatrix::from_row_slice(1, 2, &[1.0, 2.0]),
        )
        .is_err());

        assert!(CovarianceMatrix::new(
            vec!["A".to_string(), "B".to_string()],
            DMatrix::from_row_slice(1, 1, &[1.0]),
        )
        .is_err());
    }
}
