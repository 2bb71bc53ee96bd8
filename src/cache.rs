//! Bucketed memoisation for the conditional-probability kernel.
//!
//! - `BucketIndexer` maps a value in a known `[min, max]` range onto one of `N`
//!   buckets: `round((v - min) / width * (N - 1))`.
//! - `QuantizedCache` is a direct-mapped table of `N` slots. A write always
//!   replaces whatever the slot held; values landing in the same bucket share
//!   one memoised result.
//!
//! A cache lives for exactly one aggregate-posterior evaluation.

/// Buckets used when memoising over feature distances.
pub const FEATURE_BUCKETS: usize = 51;
/// Buckets used when memoising over similarities in `[0, 1]`.
pub const SIMILARITY_BUCKETS: usize = 101;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BucketIndexer {
    min: f64,
    width: f64,
    buckets: usize,
}

impl BucketIndexer {
    /// Indexer over `[min, min + width]`.
    ///
    /// # Panics
    ///
    /// Panics if `buckets == 0`.
    pub fn new(min: f64, width: f64, buckets: usize) -> Self {
        assert!(buckets > 0, "an indexer needs at least one bucket");
        Self {
            min,
            width,
            buckets,
        }
    }

    /// Indexer over `[min, max]`.
    pub fn from_range(min: f64, max: f64, buckets: usize) -> Self {
        Self::new(min, max - min, buckets)
    }

    /// Indexer spanning the smallest and largest of `values`.
    /// An empty slice gives the unit range.
    pub fn from_values(values: &[f64], buckets: usize) -> Self {
        if values.is_empty() {
            return Self::from_range(0.0, 1.0, buckets);
        }
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Self::from_range(min, max, buckets)
    }

    #[inline]
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Bucket for `value`.
    ///
    /// Values outside the configured range are clamped to the first or last
    /// bucket. A zero-width range or a NaN value lands in bucket 0.
    #[inline]
    pub fn index_for(&self, value: f64) -> usize {
        let scaled = ((value - self.min) / self.width * (self.buckets - 1) as f64).round();
        // `as` saturates: NaN and negatives become 0
        (scaled as usize).min(self.buckets - 1)
    }
}

/// Fixed-capacity direct-mapped cache of `f64` results.
#[derive(Clone, Debug)]
pub struct QuantizedCache {
    occupied: Vec<bool>,
    values: Vec<f64>,
}

impl QuantizedCache {
    /// Cache with `slots` empty slots.
    pub fn new(slots: usize) -> Self {
        Self {
            occupied: vec![false; slots],
            values: vec![-1.0; slots],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether slot `index` holds a value.
    #[inline]
    pub fn is_occupied_at(&self, index: usize) -> bool {
        self.occupied[index]
    }

    /// Raw slot content. Meaningless unless `is_occupied_at(index)`.
    #[inline]
    pub fn read(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Slot content if occupied.
    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.occupied[index].then(|| self.values[index])
    }

    /// Stores `value` and marks the slot occupied, overwriting any previous value.
    #[inline]
    pub fn write(&mut self, index: usize, value: f64) {
        self.values[index] = value;
        self.occupied[index] = true;
    }

    /// Returns the memoised value for `index`, computing and storing it first
    /// if the slot is empty.
    #[inline]
    pub fn get_or_insert_with<F: FnOnce() -> f64>(&mut self, index: usize, compute: F) -> f64 {
        match self.get(index) {
            Some(v) => v,
            None => {
                let v = compute();
                self.write(index, v);
                v
            }
        }
    }

    /// Number of occupied slots.
    pub fn occupancy(&self) -> usize {
        self.occupied.iter().filter(|&&o| o).count()
    }
}
