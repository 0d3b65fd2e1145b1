//! Stratified split on a binned numeric column.
//!
//! Each row is given a category `ceil(value)`, with every category at or above
//! `cap` merged into `cap`. One stratified shuffle-split then picks train and
//! test rows so every category appears in both sides in close to its overall
//! proportion:
//!
//! 1. `n_test = ceil(test_ratio * n)`, `n_train = n - n_test`.
//! 2. Train counts per category are the closest integer allocation of
//!    `n_train` to the category proportions: floor of each share, then the
//!    leftover rows go to the largest fractional remainders, ties broken by
//!    the seeded RNG. Test counts are allocated the same way from what is left.
//! 3. Rows are shuffled within each category before being dealt out, and both
//!    sides are shuffled at the end.
//!
//! The category lives in a transient `<column>_cat` column that is dropped
//! from both sides before they are returned. A column of that name already in
//! the input is overwritten, so it is absent from both sides too.

use super::{seeded_rng, validate_ratio, Split, SplitError, SplitIndices, Splitter};
use super::{DEFAULT_SEED, DEFAULT_TEST_RATIO};
use crate::dataset::{Dataset, Value};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Category of every row: `ceil(value)`, capped at `cap`.
pub fn category_labels(data: &Dataset, column: &str, cap: i64) -> Result<Vec<i64>, SplitError> {
    let cells = data
        .column(column)
        .map_err(|_| SplitError::ColumnNotFound(column.to_string()))?;

    cells
        .enumerate()
        .map(|(row, value)| -> Result<i64, SplitError> {
            let v = value
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| SplitError::NonNumeric {
                    column: column.to_string(),
                    row,
                    value: value.to_string(),
                })?;
            let bin = v.ceil();
            Ok(if bin >= cap as f64 { cap } else { bin as i64 })
        })
        .collect()
}

/// Share of rows in each category.
pub fn category_proportions(labels: &[i64]) -> BTreeMap<i64, f64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let total = labels.len() as f64;
    counts
        .into_iter()
        .map(|(label, count)| (label, count as f64 / total))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StratifiedSplitter {
    pub column: String,
    pub cap: i64,
    pub test_ratio: f64,
    pub seed: u64,
}

impl StratifiedSplitter {
    /// Stratify on `column` capped at `cap`, with a 0.2 test ratio and seed 42.
    pub fn new(column: impl Into<String>, cap: i64) -> Self {
        Self {
            column: column.into(),
            cap,
            test_ratio: DEFAULT_TEST_RATIO,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_test_ratio(mut self, test_ratio: f64) -> Self {
        self.test_ratio = test_ratio;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn cat_column(&self) -> String {
        format!("{}_cat", self.column)
    }

    /// Stratified shuffle-split over precomputed category labels.
    fn indices_for_labels(&self, labels: &[i64]) -> Result<SplitIndices, SplitError> {
        validate_ratio(self.test_ratio)?;

        // Sorted by label; members in ascending row order.
        let mut classes: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (row, &label) in labels.iter().enumerate() {
            classes.entry(label).or_default().push(row);
        }

        if let Some((&label, members)) = classes.iter().min_by_key(|(_, m)| m.len()) {
            if members.len() < 2 {
                return Err(SplitError::TooFewMembers {
                    label,
                    count: members.len(),
                });
            }
        }

        let n = labels.len();
        let n_test = (self.test_ratio * n as f64).ceil() as usize;
        let n_train = n - n_test;
        let n_classes = classes.len();
        if n_train < n_classes {
            return Err(SplitError::TooFewSamples {
                side: "train",
                size: n_train,
                categories: n_classes,
            });
        }
        if n_test < n_classes {
            return Err(SplitError::TooFewSamples {
                side: "test",
                size: n_test,
                categories: n_classes,
            });
        }

        let mut rng = seeded_rng(self.seed);
        let counts: Vec<usize> = classes.values().map(Vec::len).collect();
        let train_counts = approximate_mode(&counts, n_train, &mut rng);
        let remaining: Vec<usize> = counts
            .iter()
            .zip(&train_counts)
            .map(|(c, t)| c - t)
            .collect();
        let test_counts = approximate_mode(&remaining, n_test, &mut rng);

        let mut indices = SplitIndices::default();
        let allocations = train_counts.iter().zip(&test_counts);
        for (mut members, (&n_tr, &n_te)) in classes.into_values().zip(allocations) {
            members.shuffle(&mut rng);
            indices.train.extend_from_slice(&members[..n_tr]);
            indices.test.extend_from_slice(&members[n_tr..n_tr + n_te]);
        }
        indices.train.shuffle(&mut rng);
        indices.test.shuffle(&mut rng);
        Ok(indices)
    }
}

impl Splitter for StratifiedSplitter {
    fn name(&self) -> &str {
        "stratified"
    }

    fn split_indices(&self, data: &Dataset) -> Result<SplitIndices, SplitError> {
        let labels = category_labels(data, &self.column, self.cap)?;
        self.indices_for_labels(&labels)
    }

    fn split(&self, data: &Dataset) -> Result<Split, SplitError> {
        let labels = category_labels(data, &self.column, self.cap)?;
        let indices = self.indices_for_labels(&labels)?;

        let cat_column = self.cat_column();
        let cells: Vec<Value> = labels.into_iter().map(Value::Int).collect();
        let binned = if data.column_index(&cat_column).is_some() {
            log::warn!("overwriting existing column {cat_column}; it is dropped from the split");
            let mut base = data.clone();
            base.drop_column(&cat_column)?;
            base.with_column(&cat_column, cells)?
        } else {
            data.with_column(&cat_column, cells)?
        };
        let mut split = indices.apply(&binned)?;
        split.train.drop_column(&cat_column)?;
        split.test.drop_column(&cat_column)?;

        log::debug!(
            "stratified split on {} (cap {}): {} train, {} test",
            self.column,
            self.cap,
            split.train.len(),
            split.test.len()
        );
        Ok(split)
    }
}

/// Closest integer allocation of `n_draws` across `counts`, proportionally.
///
/// Each category gets the floor of its share; the rows still missing go to
/// the categories with the largest fractional remainders, choosing at random
/// among equal remainders. Never allocates more than a category holds.
fn approximate_mode(counts: &[usize], n_draws: usize, rng: &mut StdRng) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let continuous: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 / total as f64 * n_draws as f64)
        .collect();
    let mut floored: Vec<usize> = continuous.iter().map(|c| c.floor() as usize).collect();
    let mut need = n_draws.saturating_sub(floored.iter().sum());
    if need == 0 {
        return floored;
    }

    let remainder: Vec<f64> = continuous
        .iter()
        .zip(&floored)
        .map(|(c, &f)| c - f as f64)
        .collect();
    let mut levels = remainder.clone();
    levels.sort_by(|a, b| b.total_cmp(a));
    levels.dedup();

    for level in levels {
        let tied: Vec<usize> = (0..remainder.len())
            .filter(|&i| remainder[i] == level)
            .collect();
        let add_now = tied.len().min(need);
        for &i in tied.choose_multiple(rng, add_now) {
            floored[i] += 1;
        }
        need -= add_now;
        if need == 0 {
            break;
        }
    }
    floored
}

/// Stratified split of `data` on `column` capped at `cap`, with a 0.2 test
/// ratio and seed 42.
pub fn stratified_split(data: &Dataset, column: &str, cap: i64) -> Result<Split, SplitError> {
    StratifiedSplitter::new(column, cap).split(data)
}
