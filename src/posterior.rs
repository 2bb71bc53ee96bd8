//! Aggregate posterior score (APS).
//!
//! For a target item, every training item i gets a conditional-probability
//! weight CP_i evaluated at its own distance (or similarity) to the target.
//! The score is the CP-weighted mean of the training activities:
//!
//! ```text
//! APS = Σ A_i · CP_i / Σ CP_i
//! ```
//!
//! CP values are memoised per call in a [`QuantizedCache`], keyed by the
//! bucket of the reference value. When every CP is zero the ratio is
//! non-finite; that is returned as-is.

use log::trace;

use crate::cache::{BucketIndexer, QuantizedCache, FEATURE_BUCKETS, SIMILARITY_BUCKETS};
use crate::kernel::{conditional_probability, conditional_probability_sim};
use crate::matrix::Matrix;

#[inline]
fn weighted_mean(activities: &[f64], weights: &[f64]) -> f64 {
    let numerator: f64 = activities.iter().zip(weights).map(|(a, w)| a * w).sum();
    let denominator: f64 = weights.iter().sum();
    numerator / denominator
}

/// Feature-distance APS with the default bucket count.
///
/// `features[i]` is training item i's value in one feature column and
/// `target` is the target item's value in that column.
pub fn aggregate_posterior<C>(
    target: f64,
    threshold: f64,
    features: &[f64],
    activities: &[f64],
    compare: C,
) -> f64
where
    C: Fn(f64, f64) -> bool,
{
    aggregate_posterior_with_buckets(
        target,
        threshold,
        features,
        activities,
        compare,
        FEATURE_BUCKETS,
    )
}

/// Feature-distance APS over `buckets` cache slots.
///
/// Distances are `features[i] - target`; the bucket range is their observed
/// minimum and maximum.
///
/// # Panics
///
/// Panics if `features` and `activities` differ in length.
pub fn aggregate_posterior_with_buckets<C>(
    target: f64,
    threshold: f64,
    features: &[f64],
    activities: &[f64],
    compare: C,
    buckets: usize,
) -> f64
where
    C: Fn(f64, f64) -> bool,
{
    assert_eq!(
        features.len(),
        activities.len(),
        "features and activities must have the same length"
    );

    let distances: Vec<f64> = features.iter().map(|&f| f - target).collect();

    let indexer = BucketIndexer::from_values(&distances, buckets);
    let mut cache = QuantizedCache::new(buckets);

    let cps: Vec<f64> = distances
        .iter()
        .map(|&d| {
            cache.get_or_insert_with(indexer.index_for(d), || {
                conditional_probability(d, threshold, &distances, activities, &compare)
            })
        })
        .collect();

    trace!(
        "APS(feature): {} items, {} distinct buckets",
        cps.len(),
        cache.occupancy()
    );
    weighted_mean(activities, &cps)
}

/// Similarity APS with the default bucket count.
///
/// `target` is the target's column in `similarities`; rows `0..activities.len()`
/// are the training items.
pub fn aggregate_posterior_sim(
    target: usize,
    threshold: f64,
    similarities: &Matrix,
    activities: &[f64],
) -> f64 {
    aggregate_posterior_sim_with_buckets(
        target,
        threshold,
        similarities,
        activities,
        SIMILARITY_BUCKETS,
    )
}

/// Similarity APS over `buckets` cache slots spanning `[0, 1]`.
///
/// # Panics
///
/// Panics if `target` is not a column of `similarities` or the matrix has
/// fewer rows than there are activities.
pub fn aggregate_posterior_sim_with_buckets(
    target: usize,
    threshold: f64,
    similarities: &Matrix,
    activities: &[f64],
    buckets: usize,
) -> f64 {
    assert!(
        target < similarities.ncols(),
        "target column {} out of bounds for {:?}",
        target,
        similarities.shape()
    );

    let indexer = BucketIndexer::from_range(0.0, 1.0, buckets);
    let mut cache = QuantizedCache::new(buckets);

    let cps: Vec<f64> = (0..activities.len())
        .map(|i| {
            let s = similarities.at(i, target);
            cache.get_or_insert_with(indexer.index_for(s), || {
                conditional_probability_sim(s, threshold, similarities, activities)
            })
        })
        .collect();

    trace!(
        "APS(similarity) target={}: {} items, {} distinct buckets",
        target,
        cps.len(),
        cache.occupancy()
    );
    weighted_mean(activities, &cps)
}
