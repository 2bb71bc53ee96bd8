//! Whitespace-delimited problem stream.
//!
//! Layout, all tokens separated by any whitespace:
//!
//! ```text
//! X Y
//! (X+Y) rows of (X+Y) similarity values
//! X training records
//! Y testing records
//! ```
//!
//! Records are single tokens (no embedded whitespace). Similarity rows are fed
//! through a [`SimilarityAccumulator`], so the similarity matrix is only built
//! once every row is present.

use std::io::{BufRead, Read, Write};

use log::{debug, info};

use crate::errors::{RankError, RankResult};
use crate::matrix::Matrix;
use crate::similarity::SimilarityAccumulator;

/// Everything one ranking request needs.
#[derive(Clone, Debug)]
pub struct Problem {
    pub training: Vec<String>,
    pub testing: Vec<String>,
    pub similarities: Matrix,
}

fn next_token<'a, I: Iterator<Item = &'a str>>(tokens: &mut I, what: &str) -> RankResult<&'a str> {
    tokens
        .next()
        .ok_or_else(|| RankError::Parse(format!("unexpected end of input while reading {}", what)))
}

fn parse_count<'a, I: Iterator<Item = &'a str>>(tokens: &mut I, what: &str) -> RankResult<usize> {
    let tok = next_token(tokens, what)?;
    tok.parse::<usize>()
        .map_err(|e| RankError::Parse(format!("{} {:?}: {}", what, tok, e)))
}

/// Reads a full problem from `reader`.
pub fn read_problem<R: BufRead>(mut reader: R, alignment: usize) -> RankResult<Problem> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    let mut tokens = input.split_whitespace();

    let n_train = parse_count(&mut tokens, "training count")?;
    let n_test = parse_count(&mut tokens, "testing count")?;
    let order = n_train.checked_add(n_test).ok_or_else(|| {
        RankError::Parse(format!(
            "item counts {} + {} overflow",
            n_train, n_test
        ))
    })?;
    info!(
        "Reading problem: {} training, {} testing items",
        n_train, n_test
    );

    // grows with the rows actually read, never from the header alone
    let mut accumulator = SimilarityAccumulator::new();
    for i in 0..order {
        let row = (0..order)
            .map(|j| {
                let tok = next_token(&mut tokens, "similarity")?;
                tok.parse::<f64>().map_err(|e| {
                    RankError::Parse(format!("similarity ({}, {}) {:?}: {}", i, j, tok, e))
                })
            })
            .collect::<RankResult<Vec<f64>>>()?;
        accumulator.accumulate(i, row);
    }
    let similarities = accumulator.finalize(alignment)?;

    let mut take_records = |count: usize, what: &str| -> RankResult<Vec<String>> {
        (0..count)
            .map(|_| next_token(&mut tokens, what).map(str::to_owned))
            .collect()
    };
    let training = take_records(n_train, "training record")?;
    let testing = take_records(n_test, "testing record")?;
    debug!("Problem read: similarity matrix {:?}", similarities.shape());

    Ok(Problem {
        training,
        testing,
        similarities,
    })
}

/// Writes one index per line.
pub fn write_ranking<W: Write>(mut writer: W, indices: &[usize]) -> RankResult<()> {
    for idx in indices {
        writeln!(writer, "{}", idx)?;
    }
    writer.flush()?;
    Ok(())
}
