//! Train/test splitting strategies.
//!
//! Every strategy works in two steps: choose row positions
//! ([`SplitIndices`]), then materialize the two subsets ([`Split`]). The two
//! index lists are disjoint and together cover every input row exactly once.
//!
//! - [`random`]: seeded permutation, not stable as the dataset grows
//! - [`hash`]: per-row identifier hash, stable as the dataset grows
//! - [`stratified`]: preserves the proportions of a binned numeric column
//!
//! Randomness is never global: each strategy takes an explicit seed and builds
//! its own `StdRng`, so results do not depend on call order.

pub mod hash;
pub mod random;
pub mod stratified;

use crate::dataset::{Dataset, DatasetError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

pub use hash::{split_train_test_by_id, Blake3Hasher, HashSplitter, IdHasher, Md5Hasher};
pub use random::{split_train_test, RandomSplitter};
pub use stratified::{
    category_labels, category_proportions, stratified_split, StratifiedSplitter,
};

/// Test fraction used when none is given.
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Errors from the splitting layer.
#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    #[error("test ratio must be strictly between 0 and 1, got {0}")]
    InvalidRatio(f64),

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("row {row}: identifier {value} in column '{column}' is not a 64-bit integer")]
    InvalidIdentifier {
        column: String,
        row: usize,
        value: String,
    },

    #[error("row {row}: value {value} in column '{column}' is not a finite number")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error(
        "the least populated category ({label}) has only {count} member(s); \
         every category needs at least 2"
    )]
    TooFewMembers { label: i64, count: usize },

    #[error("{side} set of {size} row(s) is smaller than the {categories} categories")]
    TooFewSamples {
        side: &'static str,
        size: usize,
        categories: usize,
    },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Row positions chosen for each side of a split.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl SplitIndices {
    /// Materialize both subsets from `data`.
    pub fn apply(&self, data: &Dataset) -> Result<Split, SplitError> {
        Ok(Split {
            train: data.take(&self.train)?,
            test: data.take(&self.test)?,
        })
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.test.is_empty()
    }
}

/// A train/test pair of datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

/// A train/test splitting strategy.
pub trait Splitter {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Choose the row positions for each side.
    fn split_indices(&self, data: &Dataset) -> Result<SplitIndices, SplitError>;

    /// Choose and materialize both sides.
    fn split(&self, data: &Dataset) -> Result<Split, SplitError> {
        let indices = self.split_indices(data)?;
        log::debug!(
            "{} split: {} train, {} test",
            self.name(),
            indices.train.len(),
            indices.test.len()
        );
        indices.apply(data)
    }
}

pub(crate) fn validate_ratio(ratio: f64) -> Result<(), SplitError> {
    if ratio > 0.0 && ratio < 1.0 {
        Ok(())
    } else {
        Err(SplitError::InvalidRatio(ratio))
    }
}

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
