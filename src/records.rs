//! Feature record parsing.
//!
//! A record is one comma-separated line: 14 numeric fields, one textual
//! identifier (skipped), then 8 more numeric fields. The 22 numbers fill matrix
//! columns 0..22; column 21 is the activity.
//!
//! Parsing is best effort. A field that does not parse, or is missing, leaves
//! its cell at 0.0.

use log::{debug, trace};

use crate::matrix::Matrix;

/// Numeric columns per record.
pub const FEATURE_COUNT: usize = 22;
/// Column holding the activity value.
pub const ACTIVITY_INDEX: usize = 21;
/// Position, among the comma-separated fields, of the skipped identifier.
pub const SKIPPED_FIELD: usize = 14;

/// Parses `record` into `row` (length [`FEATURE_COUNT`]).
///
/// Returns the number of fields that parsed.
///
/// # Panics
///
/// Panics if `row.len() != FEATURE_COUNT`.
pub fn parse_record(record: &str, row: &mut [f64]) -> usize {
    assert_eq!(row.len(), FEATURE_COUNT, "row must hold {} values", FEATURE_COUNT);

    let numeric = record
        .split(',')
        .enumerate()
        .filter(|&(pos, _)| pos != SKIPPED_FIELD)
        .map(|(_, field)| field)
        .take(FEATURE_COUNT);

    let mut parsed = 0;
    for (col, field) in numeric.enumerate() {
        match field.trim().parse::<f64>() {
            Ok(v) => {
                row[col] = v;
                parsed += 1;
            }
            Err(_) => trace!("column {}: unparsable field {:?} left at default", col, field),
        }
    }
    parsed
}

/// Parses a batch of records into an `n × FEATURE_COUNT` matrix.
pub fn parse_records<S: AsRef<str>>(records: &[S], alignment: usize) -> Matrix {
    let mut m = Matrix::with_alignment(records.len(), FEATURE_COUNT, alignment);
    let mut short = 0usize;
    for (i, record) in records.iter().enumerate() {
        if parse_record(record.as_ref(), m.row_view_mut(i)) < FEATURE_COUNT {
            short += 1;
        }
    }
    debug!(
        "Parsed {} records ({} with missing or unparsable fields)",
        records.len(),
        short
    );
    m
}
