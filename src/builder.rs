use crate::cache::{FEATURE_BUCKETS, SIMILARITY_BUCKETS};
use crate::matrix::DEFAULT_ALIGNMENT;
use crate::ranking::Ranker;
use crate::records::ACTIVITY_INDEX;

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Parameters of one ranking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    // |A_i - A_j| <= threshold counts as agreement; 0.0 means exact equality
    pub activity_threshold: f64,
    pub activity_index: usize,
    pub feature_buckets: usize,
    pub similarity_buckets: usize,
    pub stride_alignment: usize,
    // adds a feature-distance posterior over this normalised column
    pub feature_column: Option<usize>,
    pub parallel: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            activity_threshold: 0.0,
            activity_index: ACTIVITY_INDEX,
            feature_buckets: FEATURE_BUCKETS,
            similarity_buckets: SIMILARITY_BUCKETS,
            stride_alignment: DEFAULT_ALIGNMENT,
            feature_column: None,
            parallel: true,
        }
    }
}

// Approximate equality on the threshold, exact on everything else
impl PartialEq for ScoringConfig {
    fn eq(&self, other: &Self) -> bool {
        approx::relative_eq!(self.activity_threshold, other.activity_threshold)
            && self.activity_index == other.activity_index
            && self.feature_buckets == other.feature_buckets
            && self.similarity_buckets == other.similarity_buckets
            && self.stride_alignment == other.stride_alignment
            && self.feature_column == other.feature_column
            && self.parallel == other.parallel
    }
}

#[derive(Debug, Clone, Default)]
pub struct RankerBuilder {
    config: ScoringConfig,
}

impl RankerBuilder {
    pub fn new() -> Self {
        info!("Initializing new RankerBuilder");
        Self::default()
    }

    /// Tolerance on activity differences for a pair to count as agreeing.
    pub fn with_activity_threshold(mut self, threshold: f64) -> Self {
        info!("Setting activity threshold: {}", threshold);
        self.config.activity_threshold = threshold;
        self
    }

    /// Column of the feature matrices holding the activity value.
    pub fn with_activity_index(mut self, index: usize) -> Self {
        info!("Setting activity column: {}", index);
        self.config.activity_index = index;
        self
    }

    /// Cache sizes for the feature-distance and similarity posteriors.
    pub fn with_buckets(mut self, feature: usize, similarity: usize) -> Self {
        info!(
            "Setting cache buckets: feature={}, similarity={}",
            feature, similarity
        );
        self.config.feature_buckets = feature.max(1);
        self.config.similarity_buckets = similarity.max(1);
        self
    }

    /// Row alignment, in elements, of every matrix built during ranking.
    pub fn with_stride_alignment(mut self, alignment: usize) -> Self {
        info!("Setting stride alignment: {}", alignment);
        self.config.stride_alignment = alignment;
        self
    }

    /// Adds a third posterior term driven by distances in one feature column.
    pub fn with_feature_column(mut self, column: Option<usize>) -> Self {
        info!("Setting feature-distance column: {:?}", column);
        self.config.feature_column = column;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        info!("Setting parallel scoring: {}", parallel);
        self.config.parallel = parallel;
        self
    }

    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Ranker {
        debug!("Building Ranker with {:?}", self.config);
        Ranker::new(self.config)
    }
}
