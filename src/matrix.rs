//! Dense row-major matrix with a padded row stride.
//!
//! `Matrix` stores `nrows × ncols` logical cells in one contiguous buffer, but
//! each row occupies `stride >= ncols` slots so that every row starts on an
//! alignment boundary. The padding slots are allocated and never read.
//!
//! Shape and stride are fixed at construction. Every offset is computed from
//! the stride, never from the logical column count.
//!
//! # Examples
//!
//! ```
//! use cprank::matrix::Matrix;
//!
//! let mut m = Matrix::with_alignment(2, 3, 8);
//! assert_eq!(m.stride(), 8);
//!
//! m.copy_row_from(1, &[1.0, 2.0, 3.0]);
//! m.write(0, 2, 9.0);
//!
//! assert_eq!(m.row(1), vec![1.0, 2.0, 3.0]);
//! assert_eq!(m.col(2), vec![9.0, 3.0]);
//! ```
//!
//! # Panics
//!
//! - Row accessors panic on out-of-bounds row indices.
//! - Bulk writers panic when the supplied slice length differs from the
//!   logical row or column length.
//!
//! # Performance
//!
//! - `row_view` is zero-copy; `row` and `col` always allocate an independent
//!   vector, so mutating the result never touches the matrix.

use smartcore::linalg::basic::arrays::{Array, Array2};
use smartcore::linalg::basic::matrix::DenseMatrix;

/// Default row alignment, in elements.
pub const DEFAULT_ALIGNMENT: usize = 512;

#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    nrows: usize,
    ncols: usize,
    stride: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled matrix with the default row alignment.
    #[inline]
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self::filled(nrows, ncols, 0.0, DEFAULT_ALIGNMENT)
    }

    /// Zero-filled matrix whose rows start on multiples of `alignment` elements.
    ///
    /// An alignment of 0 or 1 disables padding.
    #[inline]
    pub fn with_alignment(nrows: usize, ncols: usize, alignment: usize) -> Self {
        Self::filled(nrows, ncols, 0.0, alignment)
    }

    /// Matrix with every cell set to `value`.
    pub fn filled(nrows: usize, ncols: usize, value: f64, alignment: usize) -> Self {
        let stride = effective_stride(ncols, alignment);
        Self {
            nrows,
            ncols,
            stride,
            data: vec![value; nrows * stride],
        }
    }

    /// Builds from equally sized rows.
    ///
    /// # Panics
    ///
    /// Panics if rows have differing lengths.
    pub fn from_rows(rows: &[Vec<f64>], alignment: usize) -> Self {
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut m = Self::with_alignment(rows.len(), ncols, alignment);
        for (i, row) in rows.iter().enumerate() {
            m.copy_row_from(i, row);
        }
        m
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Physical length of one row, padding included.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns (nrows, ncols).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[inline]
    fn row_start(&self, row: usize) -> usize {
        row * self.stride
    }

    /// Overwrites the logical part of `row`; padding is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != ncols` or `row >= nrows`.
    pub fn copy_row_from(&mut self, row: usize, src: &[f64]) {
        assert_eq!(
            src.len(),
            self.ncols,
            "row length {} does not match matrix width {}",
            src.len(),
            self.ncols
        );
        self.row_view_mut(row).copy_from_slice(src);
    }

    /// Reads one cell. Only `col < ncols` is checked, and only in debug builds;
    /// the row index is checked by the buffer.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        debug_assert!(col < self.ncols, "column {} out of bounds", col);
        self.data[self.row_start(row) + col]
    }

    /// Writes one cell. Same checking contract as [`Matrix::at`].
    #[inline]
    pub fn write(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(col < self.ncols, "column {} out of bounds", col);
        let start = self.row_start(row);
        self.data[start + col] = value;
    }

    /// Zero-copy view of the logical part of `row`.
    #[inline]
    pub fn row_view(&self, row: usize) -> &[f64] {
        assert!(row < self.nrows, "Row index out of bounds");
        let start = self.row_start(row);
        &self.data[start..start + self.ncols]
    }

    /// Zero-copy mutable view of the logical part of `row`.
    #[inline]
    pub fn row_view_mut(&mut self, row: usize) -> &mut [f64] {
        assert!(row < self.nrows, "Row index out of bounds");
        let start = self.row_start(row);
        &mut self.data[start..start + self.ncols]
    }

    /// Owned copy of `row`.
    #[inline]
    pub fn row(&self, row: usize) -> Vec<f64> {
        self.row_view(row).to_vec()
    }

    /// Owned copy of column `col`, walking the buffer by stride.
    ///
    /// # Panics
    ///
    /// Panics if `col >= ncols`.
    pub fn col(&self, col: usize) -> Vec<f64> {
        assert!(col < self.ncols, "Column index out of bounds");
        self.data
            .iter()
            .skip(col)
            .step_by(self.stride.max(1))
            .take(self.nrows)
            .copied()
            .collect()
    }

    /// Replaces column `col` in place.
    ///
    /// # Panics
    ///
    /// Panics if `col >= ncols` or `values.len() != nrows`.
    pub fn set_col(&mut self, col: usize, values: &[f64]) {
        assert!(col < self.ncols, "Column index out of bounds");
        assert_eq!(
            values.len(),
            self.nrows,
            "column length {} does not match matrix height {}",
            values.len(),
            self.nrows
        );
        let stride = self.stride;
        for (row, &v) in values.iter().enumerate() {
            self.data[row * stride + col] = v;
        }
    }

    /// Iterates over logical rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.nrows).map(move |r| self.row_view(r))
    }

    /// Unpadded row-major copy as a smartcore matrix.
    pub fn to_dense_matrix(&self) -> DenseMatrix<f64> {
        DenseMatrix::from_iterator(
            self.rows().flat_map(|r| r.iter().copied()),
            self.nrows,
            self.ncols,
            0,
        )
    }
}

impl From<&DenseMatrix<f64>> for Matrix {
    fn from(dm: &DenseMatrix<f64>) -> Self {
        let (nrows, ncols) = dm.shape();
        let mut m = Matrix::new(nrows, ncols);
        for r in 0..nrows {
            for c in 0..ncols {
                m.write(r, c, *dm.get((r, c)));
            }
        }
        m
    }
}

/// Rounds `ncols` up to the next multiple of `alignment`.
#[inline]
pub fn effective_stride(ncols: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        return ncols;
    }
    match ncols % alignment {
        0 => ncols,
        rem => ncols + alignment - rem,
    }
}
