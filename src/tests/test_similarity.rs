use crate::errors::RankError;
use crate::similarity::{euclidean, jaccard, jaccard_matrix, without_column, SimilarityAccumulator};
use crate::tests::init;

use approx::assert_relative_eq;

#[test]
fn test_jaccard_values() {
    assert_relative_eq!(jaccard(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 1.0);
    assert_eq!(jaccard(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    // <u,v>=1, |u|²=1, |v|²=2 -> 1 / (1 + 2 - 1)
    assert_relative_eq!(jaccard(&[1.0, 0.0], &[1.0, 1.0]), 0.5);
    // sign is dropped
    assert_relative_eq!(jaccard(&[1.0, 0.0], &[-1.0, -1.0]), 1.0 / 4.0);
}

#[test]
fn test_jaccard_in_unit_interval() {
    let vs = [
        vec![0.3, -1.2, 2.0],
        vec![-0.5, 0.4, 0.1],
        vec![1.0, 1.0, -1.0],
        vec![2.5, -0.1, 0.0],
    ];
    for u in &vs {
        for v in &vs {
            let s = jaccard(u, v);
            assert!((0.0..=1.0).contains(&s), "jaccard {}", s);
        }
    }
}

#[test]
fn test_euclidean() {
    assert_relative_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
    assert_eq!(euclidean(&[1.5, -2.0], &[1.5, -2.0]), 0.0);
}

#[test]
fn test_without_column() {
    assert_eq!(without_column(&[1.0, 2.0, 3.0], Some(1)), vec![1.0, 3.0]);
    assert_eq!(without_column(&[1.0, 2.0], None), vec![1.0, 2.0]);
}

#[test]
fn test_jaccard_matrix_blocks() {
    init();
    let training = vec![vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 2.0]];
    let queries = vec![vec![2.0, 1.0]];

    for parallel in [false, true] {
        let m = jaccard_matrix(&training, &queries, 8, parallel);
        assert_eq!(m.shape(), (4, 4));
        for i in 0..3 {
            assert_relative_eq!(m.at(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(m.at(i, j), m.at(j, i));
                assert_relative_eq!(m.at(i, j), jaccard(&training[i], &training[j]));
            }
            assert_relative_eq!(m.at(i, 3), jaccard(&training[i], &queries[0]));
            assert_eq!(m.at(3, i), m.at(i, 3));
        }
        // query x query is never filled
        assert_eq!(m.at(3, 3), 0.0);
    }
}

#[test]
fn test_accumulator_out_of_order() {
    let mut acc = SimilarityAccumulator::new();
    acc.accumulate(2, vec![0.2, 0.4, 1.0]);
    assert!(!acc.is_complete());
    acc.accumulate(0, vec![1.0, 0.3, 0.2]);
    acc.accumulate(1, vec![0.3, 1.0, 0.4]);
    assert!(acc.is_complete());
    assert_eq!(acc.order(), 3);

    let m = acc.finalize(4).unwrap();
    assert_eq!(m.shape(), (3, 3));
    assert_eq!(m.stride(), 4);
    assert_eq!(m.row(2), vec![0.2, 0.4, 1.0]);
    assert_eq!(m.col(1), vec![0.3, 1.0, 0.4]);
}

#[test]
fn test_accumulator_resubmission_replaces() {
    let mut acc = SimilarityAccumulator::with_order(2);
    acc.accumulate(0, vec![1.0, 0.0]);
    acc.accumulate(1, vec![0.0, 1.0]);
    acc.accumulate(0, vec![1.0, 0.5]);
    let m = acc.finalize(1).unwrap();
    assert_eq!(m.row(0), vec![1.0, 0.5]);
}

#[test]
fn test_accumulator_missing_row() {
    let mut acc = SimilarityAccumulator::new();
    acc.accumulate(0, vec![1.0, 0.5]);
    assert_eq!(acc.finalize(8).unwrap_err(), RankError::MissingRow(1));
}

#[test]
fn test_accumulator_ragged_row() {
    let mut acc = SimilarityAccumulator::with_order(3);
    acc.accumulate(0, vec![1.0, 0.5, 0.2]);
    acc.accumulate(1, vec![0.5, 1.0]);
    acc.accumulate(2, vec![0.2, 0.1, 1.0]);
    assert!(matches!(acc.finalize(8), Err(RankError::Shape(_))));
}
