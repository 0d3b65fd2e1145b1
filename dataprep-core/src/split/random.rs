//! Random permutation split.
//!
//! A seeded permutation of `0..n`; the first `floor(n * ratio)` positions are
//! the test set. The same seed and row count always give the same partition,
//! but appending rows reshuffles everything.

use super::{seeded_rng, validate_ratio, Split, SplitError, SplitIndices, Splitter};
use super::{DEFAULT_SEED, DEFAULT_TEST_RATIO};
use crate::dataset::Dataset;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, PartialEq)]
pub struct RandomSplitter {
    pub test_ratio: f64,
    pub seed: u64,
}

impl RandomSplitter {
    pub fn new(test_ratio: f64, seed: u64) -> Self {
        Self { test_ratio, seed }
    }
}

impl Default for RandomSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_RATIO, DEFAULT_SEED)
    }
}

impl Splitter for RandomSplitter {
    fn name(&self) -> &str {
        "random"
    }

    fn split_indices(&self, data: &Dataset) -> Result<SplitIndices, SplitError> {
        validate_ratio(self.test_ratio)?;
        Ok(permutation_split(data.len(), self.test_ratio, self.seed))
    }
}

/// Partition `0..n` by a seeded permutation. Both sides keep permutation order.
fn permutation_split(n: usize, test_ratio: f64, seed: u64) -> SplitIndices {
    let mut rng = seeded_rng(seed);
    let mut shuffled: Vec<usize> = (0..n).collect();
    shuffled.shuffle(&mut rng);

    let test_size = (n as f64 * test_ratio).floor() as usize;
    let train = shuffled.split_off(test_size);
    SplitIndices {
        train,
        test: shuffled,
    }
}

/// Random split of `data` with the given test fraction and seed.
pub fn split_train_test(data: &Dataset, test_ratio: f64, seed: u64) -> Result<Split, SplitError> {
    RandomSplitter::new(test_ratio, seed).split(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_floored() {
        let idx = permutation_split(10, 0.25, 7);
        assert_eq!(idx.test.len(), 2);
        assert_eq!(idx.train.len(), 8);

        let idx = permutation_split(3, 0.2, 7);
        assert!(idx.test.is_empty());
        assert_eq!(idx.train.len(), 3);
    }

    #[test]
    fn same_seed_same_partition() {
        assert_eq!(
            permutation_split(100, 0.2, 42),
            permutation_split(100, 0.2, 42)
        );
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(
            permutation_split(100, 0.2, 42).test,
            permutation_split(100, 0.2, 43).test
        );
    }

    #[test]
    fn covers_every_row_once() {
        let idx = permutation_split(57, 0.3, 1);
        let mut all: Vec<usize> = idx.train.iter().chain(&idx.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..57).collect::<Vec<_>>());
    }

    #[test]
    fn empty_dataset_splits_to_nothing() {
        let idx = permutation_split(0, 0.2, 42);
        assert!(idx.is_empty());
    }

    #[test]
    fn invalid_ratio_is_rejected() {
        let data = Dataset::new(vec!["a".into()], vec![]).unwrap();
        let err = RandomSplitter::new(1.5, 42).split_indices(&data).unwrap_err();
        assert_eq!(err, SplitError::InvalidRatio(1.5));
    }
}
