//! Ranking orchestrator.
//!
//! Given training and testing feature matrices plus the square similarity
//! matrix over all items (training first, then testing), produce the absolute
//! indices of the testing items ordered by descending predicted activity.
//!
//! Per ranking request:
//! 1. standardise training columns, and testing columns independently;
//! 2. take the activity column of the standardised training matrix;
//! 3. build the Jaccard matrix over standardised training rows, plus each
//!    testing row projected with the training column statistics (activity
//!    column excluded from the measure);
//! 4. score every testing item as
//!    `APS_sim(supplied similarities) + APS_sim(Jaccard)` and, when a feature
//!    column is configured, `+ APS(feature distance)`;
//! 5. sort by score, descending; NaN scores go last, ties in no fixed order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, info, trace, warn};
use rayon::prelude::*;

use crate::builder::ScoringConfig;
use crate::errors::{RankError, RankResult};
use crate::kernel::within_magnitude;
use crate::matrix::Matrix;
use crate::normalise::{normalise_columns, ColumnStats};
use crate::posterior::{aggregate_posterior_sim_with_buckets, aggregate_posterior_with_buckets};
use crate::records::parse_records;
use crate::similarity::{jaccard_matrix, without_column};

/// One testing item after scoring.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredItem {
    /// Absolute index: training count + position within the testing batch.
    pub index: usize,
    pub score: f64,
    /// Standardised feature row of the item.
    pub features: Vec<f64>,
}

/// NaN sorts below every number.
#[inline]
fn sort_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// Sorts by descending score. Unstable: tied items have no fixed order.
pub fn sort_by_score(items: &mut [ScoredItem]) {
    items.sort_unstable_by(|a, b| sort_key(b.score).total_cmp(&sort_key(a.score)));
}

// Min-heap entry: the smallest kept value sits on top
#[derive(PartialEq)]
struct Kept(f64, usize);

impl Eq for Kept {}

impl PartialOrd for Kept {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kept {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.total_cmp(&self.0).then_with(|| other.1.cmp(&self.1))
    }
}

/// Indices of the `k` largest `values`, largest first.
///
/// Keeps a bounded heap of size `k`; NaN never beats a number.
pub fn select_top_k(values: &[f64], k: usize) -> Vec<usize> {
    if k == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Kept> = BinaryHeap::with_capacity(k + 1);
    for (i, &v) in values.iter().enumerate() {
        let v = sort_key(v);
        if heap.len() < k {
            heap.push(Kept(v, i));
        } else if heap.peek().is_some_and(|min| v > min.0) {
            heap.pop();
            heap.push(Kept(v, i));
        }
    }
    // ascending heap order is descending by value
    heap.into_sorted_vec().into_iter().map(|k| k.1).collect()
}

#[derive(Debug, Clone)]
pub struct Ranker {
    config: ScoringConfig,
}

impl Ranker {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Parses both record batches and ranks the testing items.
    pub fn rank_records<S: AsRef<str>>(
        &self,
        training: &[S],
        testing: &[S],
        similarities: &Matrix,
    ) -> RankResult<Vec<usize>> {
        let align = self.config.stride_alignment;
        self.rank(
            parse_records(training, align),
            parse_records(testing, align),
            similarities,
        )
    }

    /// Absolute indices of the testing items, best first.
    pub fn rank(
        &self,
        training: Matrix,
        testing: Matrix,
        similarities: &Matrix,
    ) -> RankResult<Vec<usize>> {
        Ok(self
            .score(training, testing, similarities)?
            .into_iter()
            .map(|item| item.index)
            .collect())
    }

    /// The `k` best testing items, best first.
    pub fn rank_top_k(
        &self,
        training: Matrix,
        testing: Matrix,
        similarities: &Matrix,
        k: usize,
    ) -> RankResult<Vec<usize>> {
        let n_train = training.nrows();
        let scores = self.raw_scores(training, testing, similarities)?.0;
        Ok(select_top_k(&scores, k)
            .into_iter()
            .map(|t| t + n_train)
            .collect())
    }

    /// Scores and sorts the testing items.
    pub fn score(
        &self,
        training: Matrix,
        testing: Matrix,
        similarities: &Matrix,
    ) -> RankResult<Vec<ScoredItem>> {
        let n_train = training.nrows();
        let (scores, test_norm) = self.raw_scores(training, testing, similarities)?;

        let mut items: Vec<ScoredItem> = scores
            .into_iter()
            .enumerate()
            .map(|(t, score)| ScoredItem {
                index: n_train + t,
                score,
                features: test_norm.row(t),
            })
            .collect();
        sort_by_score(&mut items);

        info!("Ranked {} testing items", items.len());
        Ok(items)
    }

    fn validate(
        &self,
        training: &Matrix,
        testing: &Matrix,
        similarities: &Matrix,
    ) -> RankResult<()> {
        let (n_train, f) = training.shape();
        let order = n_train + testing.nrows();
        if n_train < 2 {
            return Err(RankError::Invalid(format!(
                "at least two training items are required, got {}",
                n_train
            )));
        }
        if testing.ncols() != f {
            return Err(RankError::Shape(format!(
                "testing items have {} features, training items {}",
                testing.ncols(),
                f
            )));
        }
        if self.config.activity_index >= f {
            return Err(RankError::Invalid(format!(
                "activity column {} out of range for {} features",
                self.config.activity_index, f
            )));
        }
        if let Some(c) = self.config.feature_column {
            if c >= f {
                return Err(RankError::Invalid(format!(
                    "feature column {} out of range for {} features",
                    c, f
                )));
            }
        }
        if self.config.feature_buckets == 0 || self.config.similarity_buckets == 0 {
            return Err(RankError::Invalid(format!(
                "bucket counts must be positive, got feature={} similarity={}",
                self.config.feature_buckets, self.config.similarity_buckets
            )));
        }
        if similarities.shape() != (order, order) {
            return Err(RankError::Shape(format!(
                "similarity matrix is {:?}, expected ({}, {})",
                similarities.shape(),
                order,
                order
            )));
        }
        Ok(())
    }

    /// Unsorted scores in testing-batch order, with the standardised testing matrix.
    fn raw_scores(
        &self,
        training: Matrix,
        testing: Matrix,
        similarities: &Matrix,
    ) -> RankResult<(Vec<f64>, Matrix)> {
        self.validate(&training, &testing, similarities)?;
        let cfg = &self.config;
        let n_train = training.nrows();
        let n_test = testing.nrows();

        info!(
            "Scoring {} testing items against {} training items",
            n_test, n_train
        );
        debug!("Scoring configuration: {:?}", cfg);

        let stats = ColumnStats::fit(&training);
        let train_norm = stats.apply(training);
        let projected = stats.apply(testing.clone());
        let test_norm = normalise_columns(testing);

        let activities = train_norm.col(cfg.activity_index);
        if activities.iter().any(|a| !a.is_finite()) {
            warn!("Normalised activities contain non-finite values; scores will be non-finite");
        }

        let skip = Some(cfg.activity_index);
        let train_rows: Vec<Vec<f64>> =
            train_norm.rows().map(|r| without_column(r, skip)).collect();
        let query_rows: Vec<Vec<f64>> =
            projected.rows().map(|r| without_column(r, skip)).collect();
        let jaccards = jaccard_matrix(
            &train_rows,
            &query_rows,
            cfg.stride_alignment,
            cfg.parallel,
        );

        let feature_values = cfg.feature_column.map(|c| train_norm.col(c));

        let score_one = |t: usize| -> f64 {
            let target = n_train + t;
            let by_similarity = aggregate_posterior_sim_with_buckets(
                target,
                cfg.activity_threshold,
                similarities,
                &activities,
                cfg.similarity_buckets,
            );
            let by_jaccard = aggregate_posterior_sim_with_buckets(
                target,
                cfg.activity_threshold,
                &jaccards,
                &activities,
                cfg.similarity_buckets,
            );
            let by_feature = match (cfg.feature_column, feature_values.as_ref()) {
                (Some(c), Some(values)) => aggregate_posterior_with_buckets(
                    projected.at(t, c),
                    cfg.activity_threshold,
                    values,
                    &activities,
                    within_magnitude,
                    cfg.feature_buckets,
                ),
                _ => 0.0,
            };
            trace!(
                "item {}: similarity={:.6}, jaccard={:.6}, feature={:.6}",
                target,
                by_similarity,
                by_jaccard,
                by_feature
            );
            by_similarity + by_jaccard + by_feature
        };

        let scores: Vec<f64> = if cfg.parallel {
            (0..n_test).into_par_iter().map(score_one).collect()
        } else {
            (0..n_test).map(score_one).collect()
        };

        Ok((scores, test_norm))
    }
}
