// ============================================================================
// Error Types
// ============================================================================

/// Failures raised at the boundaries of the crate: reading input streams,
/// assembling the similarity matrix and validating shapes before ranking.
///
/// The numeric core never returns errors; degenerate values propagate as
/// `0.0` or non-finite scores instead.
#[derive(Debug, Clone, PartialEq)]
pub enum RankError {
    Io(String),
    Parse(String),
    Shape(String),
    MissingRow(usize),
    Invalid(String),
}

impl std::fmt::Display for RankError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankError::Io(e) => write!(f, "IO error: {}", e),
            RankError::Parse(e) => write!(f, "Parse error: {}", e),
            RankError::Shape(e) => write!(f, "Shape mismatch: {}", e),
            RankError::MissingRow(i) => write!(f, "Similarity row {} was never submitted", i),
            RankError::Invalid(e) => write!(f, "Invalid: {}", e),
        }
    }
}

impl std::error::Error for RankError {}

impl From<std::io::Error> for RankError {
    fn from(e: std::io::Error) -> Self {
        RankError::Io(e.to_string())
    }
}

pub type RankResult<T> = Result<T, RankError>;
