//! # cprank
//!
//! Relative activity ranking by conditional probability.
//!
//! A testing item's activity is estimated from the training set alone: every
//! training item is weighted by the empirical probability that two training
//! items at least as similar as it is to the target also agree in activity,
//! and the weighted mean of training activities is the item's score. Two
//! similarity sources contribute: an externally supplied similarity matrix and
//! a continuous Jaccard measure over standardised feature vectors.
//!
//! ```
//! use cprank::builder::RankerBuilder;
//! use cprank::matrix::Matrix;
//!
//! let training = Matrix::from_rows(
//!     &[vec![1.0, 2.0, 0.5], vec![2.0, 1.0, 1.5], vec![3.0, 0.5, 1.5]],
//!     8,
//! );
//! let testing = Matrix::from_rows(&[vec![1.5, 1.0, 0.0], vec![2.5, 2.0, 0.0]], 8);
//! let similarities = Matrix::from_rows(&vec![vec![0.5; 5]; 5], 8);
//!
//! let ranking = RankerBuilder::new()
//!     .with_activity_index(2)
//!     .with_stride_alignment(8)
//!     .build()
//!     .rank(training, testing, &similarities)
//!     .unwrap();
//! assert_eq!(ranking.len(), 2);
//! ```

pub mod builder;
pub mod cache;
pub mod errors;
pub mod io;
pub mod kernel;
pub mod matrix;
pub mod normalise;
pub mod posterior;
pub mod ranking;
pub mod records;
pub mod similarity;

#[cfg(test)]
mod tests;
