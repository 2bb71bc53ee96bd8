//! Column standardisation: zero mean, unit sample standard deviation.
//!
//! The standard deviation uses the (n - 1) denominator. Columns with fewer than
//! two rows or zero spread are not guarded: the division yields non-finite
//! values that flow downstream untouched. They are only reported through
//! `warn!`.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;

/// Per-column mean and sample standard deviation of a fitted matrix.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub means: Vec<f64>,
    pub std_devs: Vec<f64>,
}

impl ColumnStats {
    /// Computes mean and sample standard deviation for every column of `matrix`.
    pub fn fit(matrix: &Matrix) -> Self {
        let (n, f) = matrix.shape();
        debug!("Fitting column statistics over {} rows x {} columns", n, f);

        let mut means = Vec::with_capacity(f);
        let mut std_devs = Vec::with_capacity(f);
        for c in 0..f {
            let column = matrix.col(c);
            let (mean, std_dev) = mean_and_sample_std(&column);
            if !(std_dev.is_finite() && std_dev > 0.0) {
                warn!(
                    "Column {} is degenerate (rows={}, std={}); values become non-finite",
                    c, n, std_dev
                );
            }
            means.push(mean);
            std_devs.push(std_dev);
        }

        Self { means, std_devs }
    }

    /// Standardises `matrix` with these statistics and hands it back.
    ///
    /// # Panics
    ///
    /// Panics if the column count differs from the fitted one.
    pub fn apply(&self, mut matrix: Matrix) -> Matrix {
        assert_eq!(
            matrix.ncols(),
            self.means.len(),
            "matrix has {} columns, statistics were fitted on {}",
            matrix.ncols(),
            self.means.len()
        );
        for r in 0..matrix.nrows() {
            for (x, (&mean, &std_dev)) in matrix
                .row_view_mut(r)
                .iter_mut()
                .zip(self.means.iter().zip(self.std_devs.iter()))
            {
                *x = (*x - mean) / std_dev;
            }
        }
        matrix
    }

    /// Standardises a single row against these statistics.
    pub fn apply_row(&self, row: &[f64]) -> Vec<f64> {
        assert_eq!(row.len(), self.means.len(), "Dimension mismatch");
        row.iter()
            .zip(self.means.iter().zip(self.std_devs.iter()))
            .map(|(&x, (&mean, &std_dev))| (x - mean) / std_dev)
            .collect()
    }
}

/// Rescales each column of `matrix` to zero mean and unit sample standard
/// deviation. Ownership goes in and comes back out.
pub fn normalise_columns(matrix: Matrix) -> Matrix {
    info!(
        "Normalising {} columns over {} rows",
        matrix.ncols(),
        matrix.nrows()
    );
    ColumnStats::fit(&matrix).apply(matrix)
}

/// Arithmetic mean and Bessel-corrected standard deviation.
pub fn mean_and_sample_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|&x| (x - mean) * (x - mean)).sum();
    (mean, (ss / (n - 1.0)).sqrt())
}
