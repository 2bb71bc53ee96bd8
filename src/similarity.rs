//! Pairwise measures and similarity-matrix assembly.
//!
//! - [`jaccard`]: normalised inner product `|⟨u,v⟩ / (‖u‖² + ‖v‖² − ⟨u,v⟩)|`,
//!   a continuous Tanimoto-style similarity in `[0, 1]`.
//! - [`euclidean`]: `sqrt(‖u‖² + ‖v‖² − 2⟨u,v⟩)`.
//! - [`jaccard_matrix`]: symmetric similarity matrix over training rows plus
//!   the training-to-query block used as reference values.
//! - [`SimilarityAccumulator`]: collects externally supplied similarity rows in
//!   any order and renders them into a [`Matrix`] once complete.

use log::{debug, info};
use rayon::prelude::*;

use crate::errors::{RankError, RankResult};
use crate::matrix::Matrix;

#[inline]
fn dot(lhs: &[f64], rhs: &[f64]) -> f64 {
    lhs.iter().zip(rhs.iter()).map(|(a, b)| a * b).sum()
}

/// Continuous Jaccard (Tanimoto) similarity between two vectors.
///
/// Two zero vectors give NaN.
///
/// # Panics
///
/// Panics if the lengths differ.
#[inline]
pub fn jaccard(lhs: &[f64], rhs: &[f64]) -> f64 {
    assert_eq!(lhs.len(), rhs.len(), "Dimension mismatch");
    let inter = dot(lhs, rhs);
    (inter / (dot(lhs, lhs) + dot(rhs, rhs) - inter)).abs()
}

/// Euclidean distance via the expanded quadratic form.
///
/// # Panics
///
/// Panics if the lengths differ.
#[inline]
pub fn euclidean(lhs: &[f64], rhs: &[f64]) -> f64 {
    assert_eq!(lhs.len(), rhs.len(), "Dimension mismatch");
    (dot(lhs, lhs) + dot(rhs, rhs) - 2.0 * dot(lhs, rhs))
        .max(0.0)
        .sqrt()
}

/// Copies `row` without column `skip`.
pub fn without_column(row: &[f64], skip: Option<usize>) -> Vec<f64> {
    row.iter()
        .enumerate()
        .filter(|&(c, _)| Some(c) != skip)
        .map(|(_, &v)| v)
        .collect()
}

/// Jaccard similarity matrix of order `training.len() + queries.len()`.
///
/// Filled cells:
/// - training × training, symmetric, diagonal included;
/// - training × query and its mirror.
///
/// Query × query cells stay 0.0; nothing reads them.
pub fn jaccard_matrix(
    training: &[Vec<f64>],
    queries: &[Vec<f64>],
    alignment: usize,
    parallel: bool,
) -> Matrix {
    let n_train = training.len();
    let order = n_train + queries.len();
    info!(
        "Building {}x{} Jaccard matrix ({} training, {} queries)",
        order,
        order,
        n_train,
        queries.len()
    );

    // row i holds similarities to training items i.. and to every query
    let row_for = |i: usize| -> Vec<f64> {
        let u = &training[i];
        training[i..]
            .iter()
            .chain(queries.iter())
            .map(|v| jaccard(u, v))
            .collect()
    };
    let upper: Vec<Vec<f64>> = if parallel {
        (0..n_train).into_par_iter().map(row_for).collect()
    } else {
        (0..n_train).map(row_for).collect()
    };

    let mut m = Matrix::with_alignment(order, order, alignment);
    for (i, row) in upper.iter().enumerate() {
        let (own, to_queries) = row.split_at(n_train - i);
        for (offset, &v) in own.iter().enumerate() {
            m.write(i, i + offset, v);
            m.write(i + offset, i, v);
        }
        // query columns start right after the training block
        for (k, &v) in to_queries.iter().enumerate() {
            m.write(i, n_train + k, v);
            m.write(n_train + k, i, v);
        }
    }
    debug!("Jaccard matrix built with stride {}", m.stride());
    m
}

/// Buffers similarity rows submitted one at a time by absolute index.
#[derive(Clone, Debug, Default)]
pub struct SimilarityAccumulator {
    rows: Vec<Option<Vec<f64>>>,
}

impl SimilarityAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator expecting `order` rows.
    pub fn with_order(order: usize) -> Self {
        Self {
            rows: vec![None; order],
        }
    }

    /// Stores `row` at `index`, replacing an earlier submission for that index.
    pub fn accumulate(&mut self, index: usize, row: Vec<f64>) {
        let needed = (index + 1).max(row.len());
        if self.rows.len() < needed {
            self.rows.resize(needed, None);
        }
        self.rows[index] = Some(row);
    }

    /// Number of rows expected so far.
    pub fn order(&self) -> usize {
        self.rows.len()
    }

    /// Whether every expected row has been submitted.
    pub fn is_complete(&self) -> bool {
        self.rows.iter().all(|r| r.is_some())
    }

    /// Renders the square matrix.
    ///
    /// Fails with `MissingRow` for the first absent row and with `Shape` when a
    /// row's length differs from the matrix order.
    pub fn finalize(self, alignment: usize) -> RankResult<Matrix> {
        let order = self.rows.len();
        let mut m = Matrix::with_alignment(order, order, alignment);
        for (i, row) in self.rows.into_iter().enumerate() {
            let row = row.ok_or(RankError::MissingRow(i))?;
            if row.len() != order {
                return Err(RankError::Shape(format!(
                    "similarity row {} has {} values, expected {}",
                    i,
                    row.len(),
                    order
                )));
            }
            m.copy_row_from(i, &row);
        }
        debug!("Similarity matrix rendered: {}x{}", order, order);
        Ok(m)
    }
}
