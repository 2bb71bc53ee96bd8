use crate::kernel::{conditional_probability, conditional_probability_sim, within_magnitude};
use crate::matrix::Matrix;
use crate::tests::random_similarities;

use approx::assert_relative_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn three_item_similarities() -> Matrix {
    Matrix::from_rows(
        &[
            vec![1.0, 0.9, 0.2],
            vec![0.9, 1.0, 0.6],
            vec![0.2, 0.6, 1.0],
        ],
        8,
    )
}

// Plain double loop over pairs, for comparison with the laned kernels
fn naive_sim(reference: f64, threshold: f64, sims: &Matrix, activities: &[f64]) -> f64 {
    let n = activities.len();
    let (mut num, mut den) = (0usize, 0usize);
    for i in 0..n {
        for j in (i + 1)..n {
            if sims.at(i, j) >= reference {
                den += 1;
                if (activities[i] - activities[j]).abs() <= threshold {
                    num += 1;
                }
            }
        }
    }
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[test]
fn test_sim_hand_computed() {
    let sims = three_item_similarities();
    let activities = [1.0, 1.0, 2.0];

    // pairs at or above 0.5: (0,1) agree, (1,2) disagree
    assert_relative_eq!(conditional_probability_sim(0.5, 0.0, &sims, &activities), 0.5);
    // a looser threshold makes (1,2) agree as well
    assert_relative_eq!(conditional_probability_sim(0.5, 1.0, &sims, &activities), 1.0);
    // only (0,1) qualifies
    assert_relative_eq!(conditional_probability_sim(0.9, 0.0, &sims, &activities), 1.0);
}

#[test]
fn test_sim_identical_activities_give_one() {
    let sims = random_similarities(20, 3, 32);
    let activities = vec![4.0; 20];
    for reference in [0.0, 0.1, 0.35, 0.8] {
        assert_eq!(conditional_probability_sim(reference, 0.0, &sims, &activities), 1.0);
    }
}

#[test]
fn test_sim_empty_denominator_gives_zero() {
    let sims = Matrix::filled(6, 6, 0.3, 8);
    let activities = [1.0, 2.0, 1.0, 2.0, 1.0, 2.0];
    assert_eq!(conditional_probability_sim(0.5, 0.0, &sims, &activities), 0.0);

    let one = Matrix::filled(1, 1, 1.0, 8);
    assert_eq!(conditional_probability_sim(0.0, 0.0, &one, &[3.0]), 0.0);
}

#[test]
fn test_sim_only_reads_training_block() {
    // a larger matrix: pairs are drawn from the first activities.len() rows only
    let mut sims = Matrix::filled(5, 5, 0.0, 8);
    sims.write(0, 1, 0.9);
    sims.write(1, 0, 0.9);
    for j in 0..5 {
        sims.write(3, j, 1.0);
        sims.write(j, 3, 1.0);
    }
    let activities = [1.0, 1.0, 2.0];
    assert_eq!(conditional_probability_sim(0.5, 0.0, &sims, &activities), 1.0);
}

#[test]
fn test_sim_matches_naive_pairs() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let n = 37;
    let sims = random_similarities(n, 5, 64);
    let activities: Vec<f64> = (0..n).map(|_| rng.random_range(0..3) as f64).collect();

    for reference in [0.05, 0.25, 0.5, 0.75, 0.95] {
        for threshold in [0.0, 1.0] {
            assert_eq!(
                conditional_probability_sim(reference, threshold, &sims, &activities),
                naive_sim(reference, threshold, &sims, &activities)
            );
        }
    }
}

#[test]
fn test_feature_hand_computed() {
    let distances = [0.0, 1.0, 3.0];
    let activities = [1.0, 1.0, 2.0];

    // |Δ| pairs: (0,1)=1, (0,2)=3, (1,2)=2
    assert_relative_eq!(
        conditional_probability(1.5, 0.0, &distances, &activities, within_magnitude),
        1.0
    );
    assert_relative_eq!(
        conditional_probability(2.5, 0.0, &distances, &activities, within_magnitude),
        0.5
    );
    assert_eq!(
        conditional_probability(0.5, 0.0, &distances, &activities, within_magnitude),
        0.0
    );
}

#[test]
fn test_feature_custom_comparison() {
    let distances = [0.0, 1.0, 3.0];
    let activities = [1.0, 2.0, 1.0];
    // far pairs only: (0,2)=3 agrees, (1,2)=2 disagrees
    let far = |lhs: f64, rhs: f64| lhs.abs() >= rhs;
    assert_relative_eq!(
        conditional_probability(2.0, 0.0, &distances, &activities, far),
        0.5
    );
}

#[test]
fn test_feature_matches_naive_pairs() {
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let n = 29;
    let distances: Vec<f64> = (0..n).map(|_| rng.random_range(-2.0..2.0)).collect();
    let activities: Vec<f64> = (0..n).map(|_| rng.random_range(0..4) as f64).collect();

    for reference in [0.1, 0.5, 1.0, 2.0] {
        let (mut num, mut den) = (0usize, 0usize);
        for i in 0..n {
            for j in (i + 1)..n {
                if (distances[i] - distances[j]).abs() <= reference {
                    den += 1;
                    num += (activities[i] == activities[j]) as usize;
                }
            }
        }
        let expected = if den == 0 { 0.0 } else { num as f64 / den as f64 };
        assert_eq!(
            conditional_probability(reference, 0.0, &distances, &activities, within_magnitude),
            expected
        );
    }
}

#[test]
#[should_panic(expected = "same length")]
fn test_feature_length_mismatch_panics() {
    conditional_probability(0.5, 0.0, &[1.0, 2.0], &[1.0], within_magnitude);
}
