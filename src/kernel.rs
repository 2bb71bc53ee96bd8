//! Conditional-probability kernel
//!
//! Empirical estimate, over all unordered training pairs (i, j) with i < j, of
//!
//! ```text
//! CP(d*) = #{ pairs meeting the distance condition and |A_i - A_j| <= θ }
//!        / #{ pairs meeting the distance condition }
//! ```
//!
//! Two variants:
//! - feature distance: the pair value is `distances[i] - distances[j]` tested
//!   against `d*` with a caller-supplied comparison (production uses
//!   [`within_magnitude`], i.e. `|Δ| <= d*`);
//! - similarity: the pair value is `similarities[i][j]`, tested as `>= d*`.
//!
//! An empty denominator yields 0.0. Cost is O(N²) per call; the inner loop
//! walks fixed-width lanes so the compiler can vectorise it, which has no
//! effect on the result.

use crate::matrix::Matrix;

/// Inner-loop lane width.
const LANES: usize = 8;

/// `|lhs| <= rhs`; the comparison used by the feature-distance path.
#[inline]
pub fn within_magnitude(lhs: f64, rhs: f64) -> bool {
    lhs.abs() <= rhs
}

#[inline]
fn activities_agree(a_i: f64, a_j: f64, threshold: f64) -> bool {
    (a_i - a_j).abs() <= threshold
}

#[inline]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator != 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Feature-distance kernel.
///
/// `distances` and `activities` are parallel per-item vectors; `compare`
/// receives `(distances[i] - distances[j], reference)`.
///
/// # Panics
///
/// Panics if the two vectors have different lengths.
pub fn conditional_probability<C>(
    reference: f64,
    threshold: f64,
    distances: &[f64],
    activities: &[f64],
    compare: C,
) -> f64
where
    C: Fn(f64, f64) -> bool,
{
    assert_eq!(
        distances.len(),
        activities.len(),
        "distances and activities must have the same length"
    );

    let pairs: Vec<(f64, f64)> = distances
        .iter()
        .copied()
        .zip(activities.iter().copied())
        .collect();

    let mut numerator = 0usize;
    let mut denominator = 0usize;

    let mut tally = |(d_i, a_i): (f64, f64), (d_j, a_j): (f64, f64)| {
        let near = compare(d_i - d_j, reference);
        let agree = activities_agree(a_i, a_j, threshold);
        denominator += near as usize;
        numerator += (near && agree) as usize;
    };

    for (i, &p_i) in pairs.iter().enumerate() {
        let tail = &pairs[i + 1..];
        let lanes = tail.chunks_exact(LANES);
        let rest = lanes.remainder();
        for lane in lanes {
            for &p_j in lane {
                tally(p_i, p_j);
            }
        }
        for &p_j in rest {
            tally(p_i, p_j);
        }
    }

    ratio(numerator, denominator)
}

/// Similarity kernel.
///
/// Pairs are drawn from the first `activities.len()` rows and columns of
/// `similarities`; a pair meets the condition when its similarity is at least
/// `reference`.
///
/// # Panics
///
/// Panics if `similarities` is smaller than `activities.len()` in either
/// dimension.
pub fn conditional_probability_sim(
    reference: f64,
    threshold: f64,
    similarities: &Matrix,
    activities: &[f64],
) -> f64 {
    let n = activities.len();
    assert!(
        similarities.nrows() >= n && similarities.ncols() >= n,
        "similarity matrix {:?} cannot cover {} items",
        similarities.shape(),
        n
    );

    let mut numerator = 0usize;
    let mut denominator = 0usize;

    for i in 0..n.saturating_sub(1) {
        let a_i = activities[i];
        let sims = &similarities.row_view(i)[i + 1..n];
        let acts = &activities[i + 1..n];

        let sim_lanes = sims.chunks_exact(LANES);
        let act_lanes = acts.chunks_exact(LANES);
        let (sim_rest, act_rest) = (sim_lanes.remainder(), act_lanes.remainder());

        for (s_lane, a_lane) in sim_lanes.zip(act_lanes) {
            for k in 0..LANES {
                let near = s_lane[k] >= reference;
                let agree = activities_agree(a_i, a_lane[k], threshold);
                denominator += near as usize;
                numerator += (near && agree) as usize;
            }
        }
        for (&s, &a_j) in sim_rest.iter().zip(act_rest.iter()) {
            let near = s >= reference;
            let agree = activities_agree(a_i, a_j, threshold);
            denominator += near as usize;
            numerator += (near && agree) as usize;
        }
    }

    ratio(numerator, denominator)
}
