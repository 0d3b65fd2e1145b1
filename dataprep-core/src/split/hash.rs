//! Hash-stable split by row identifier.
//!
//! A row goes to the test set iff the last byte of `hash(id)` is below
//! `256 * test_ratio`, where `id` is the row's identifier as an `i64` hashed
//! over its 8 little-endian bytes. The decision depends on nothing but the
//! identifier, so a row keeps its side when rows are added, removed, or
//! reordered. The realized test fraction is only approximately `test_ratio`.

use super::{validate_ratio, Split, SplitError, SplitIndices, Splitter, DEFAULT_TEST_RATIO};
use crate::dataset::Dataset;
use md5::{Digest, Md5};

/// Hash function applied to identifiers.
pub trait IdHasher: Send + Sync {
    fn name(&self) -> &str;

    /// Digest of `input`. Only the last byte is used for the split decision.
    fn digest(&self, input: &[u8]) -> Vec<u8>;
}

/// 128-bit MD5. The default identifier hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hasher;

impl IdHasher for Md5Hasher {
    fn name(&self) -> &str {
        "md5"
    }

    fn digest(&self, input: &[u8]) -> Vec<u8> {
        Md5::digest(input).to_vec()
    }
}

/// 256-bit BLAKE3.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl IdHasher for Blake3Hasher {
    fn name(&self) -> &str {
        "blake3"
    }

    fn digest(&self, input: &[u8]) -> Vec<u8> {
        blake3::hash(input).as_bytes().to_vec()
    }
}

/// Whether identifier `id` belongs to the test set.
pub fn in_test_set(id: i64, test_ratio: f64, hasher: &dyn IdHasher) -> bool {
    let digest = hasher.digest(&id.to_le_bytes());
    match digest.last() {
        Some(&last) => f64::from(last) < 256.0 * test_ratio,
        None => false,
    }
}

pub struct HashSplitter {
    pub test_ratio: f64,
    pub id_column: String,
    hasher: Box<dyn IdHasher>,
}

impl HashSplitter {
    /// Split on `id_column` with the default MD5 hash.
    pub fn new(test_ratio: f64, id_column: impl Into<String>) -> Self {
        Self::with_hasher(test_ratio, id_column, Box::new(Md5Hasher))
    }

    pub fn with_hasher(
        test_ratio: f64,
        id_column: impl Into<String>,
        hasher: Box<dyn IdHasher>,
    ) -> Self {
        Self {
            test_ratio,
            id_column: id_column.into(),
            hasher,
        }
    }

    pub fn hasher(&self) -> &dyn IdHasher {
        self.hasher.as_ref()
    }
}

impl Default for HashSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_RATIO, "index")
    }
}

impl Splitter for HashSplitter {
    fn name(&self) -> &str {
        "hash"
    }

    fn split_indices(&self, data: &Dataset) -> Result<SplitIndices, SplitError> {
        validate_ratio(self.test_ratio)?;
        let ids = data
            .column(&self.id_column)
            .map_err(|_| SplitError::ColumnNotFound(self.id_column.clone()))?;

        let mut indices = SplitIndices::default();
        for (row, value) in ids.enumerate() {
            let id = value.to_i64().ok_or_else(|| SplitError::InvalidIdentifier {
                column: self.id_column.clone(),
                row,
                value: value.to_string(),
            })?;
            if in_test_set(id, self.test_ratio, self.hasher.as_ref()) {
                indices.test.push(row);
            } else {
                indices.train.push(row);
            }
        }
        Ok(indices)
    }
}

/// Hash-stable split of `data` on `id_column`, using MD5.
pub fn split_train_test_by_id(
    data: &Dataset,
    test_ratio: f64,
    id_column: &str,
) -> Result<Split, SplitError> {
    HashSplitter::new(test_ratio, id_column).split(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn ids(values: Vec<Value>) -> Dataset {
        Dataset::new(
            vec!["id".into()],
            values.into_iter().map(|v| vec![v]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn md5_picks_known_rows() {
        // Last MD5 bytes of 0..10 as little-endian i64:
        // 116 203 100 244 18 16 237 183 215 182; only 18 and 16 are < 51.2.
        let data = ids((0..10).map(Value::Int).collect());
        let idx = HashSplitter::new(0.2, "id").split_indices(&data).unwrap();
        assert_eq!(idx.test, vec![4, 5]);
        assert_eq!(idx.train, vec![0, 1, 2, 3, 6, 7, 8, 9]);
    }

    #[test]
    fn md5_digest_matches_reference() {
        let digest = Md5Hasher.digest(&0i64.to_le_bytes());
        assert_eq!(digest.len(), 16);
        assert_eq!(digest[15], 116);
    }

    #[test]
    fn integral_float_ids_are_accepted() {
        let data = ids(vec![Value::Float(4.0), Value::Float(0.0)]);
        let idx = HashSplitter::new(0.2, "id").split_indices(&data).unwrap();
        assert_eq!(idx.test, vec![0]);
        assert_eq!(idx.train, vec![1]);
    }

    #[test]
    fn fractional_id_is_fatal() {
        let data = ids(vec![Value::Float(1.0), Value::Float(2.5)]);
        let err = HashSplitter::new(0.2, "id").split_indices(&data).unwrap_err();
        assert_eq!(
            err,
            SplitError::InvalidIdentifier {
                column: "id".into(),
                row: 1,
                value: "2.5".into()
            }
        );
    }

    #[test]
    fn text_id_is_fatal() {
        let data = ids(vec![Value::Str("a".into())]);
        let err = HashSplitter::new(0.2, "id").split_indices(&data).unwrap_err();
        assert!(matches!(err, SplitError::InvalidIdentifier { row: 0, .. }));
    }

    #[test]
    fn missing_column_is_reported() {
        let data = ids(vec![Value::Int(1)]);
        let err = HashSplitter::new(0.2, "index").split_indices(&data).unwrap_err();
        assert_eq!(err, SplitError::ColumnNotFound("index".into()));
    }

    #[test]
    fn blake3_hasher_is_pluggable() {
        let data = ids((0..200).map(Value::Int).collect());
        let splitter = HashSplitter::with_hasher(0.5, "id", Box::new(Blake3Hasher));
        assert_eq!(splitter.hasher().name(), "blake3");
        let a = splitter.split_indices(&data).unwrap();
        let b = splitter.split_indices(&data).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 200);
        assert!(!a.test.is_empty() && !a.train.is_empty());
    }
}
