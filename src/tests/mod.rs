mod test_kernel;
mod test_similarity;

use std::sync::Once;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::matrix::Matrix;

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        // Read RUST_LOG env variable, default to "debug" if not set
        let env = env_logger::Env::default().default_filter_or("debug");

        // don't panic if called multiple times across binaries
        let _ = env_logger::Builder::from_env(env)
            .is_test(true)
            .try_init();
    });
}

/// Seeded random feature matrix with `f` columns; the last column is an
/// integer-valued activity in `0..levels` so that exact agreement happens.
pub fn random_dataset(n: usize, f: usize, levels: u32, seed: u64, alignment: usize) -> Matrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| {
            let mut row: Vec<f64> = (0..f - 1).map(|_| rng.random_range(-1.0..1.0)).collect();
            row.push(rng.random_range(0..levels) as f64);
            row
        })
        .collect();
    Matrix::from_rows(&rows, alignment)
}

/// Seeded symmetric similarity matrix in `[0, 1]` with a unit diagonal.
pub fn random_similarities(order: usize, seed: u64, alignment: usize) -> Matrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut m = Matrix::with_alignment(order, order, alignment);
    for i in 0..order {
        m.write(i, i, 1.0);
        for j in (i + 1)..order {
            // two decimals, as similarity inputs usually come
            let v = (rng.random_range(0.0..1.0f64) * 100.0).round() / 100.0;
            m.write(i, j, v);
            m.write(j, i, v);
        }
    }
    m
}
