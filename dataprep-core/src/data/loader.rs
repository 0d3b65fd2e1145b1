//! Loader: parse a CSV file into a [`Dataset`] with inferred column types.
//!
//! The first record is the header. Empty cells become `Null`. Each column is
//! typed from its content: all-integer columns are `Int`, numeric columns are
//! `Float` (an integer column with a gap also widens to `Float`), anything
//! else is `Str` and keeps its cells' original text.

use super::provider::DataError;
use crate::dataset::{ColumnType, Dataset, Value};
use crate::dataset::value::infer_column_type;
use std::path::Path;

/// Load `local_path/file_name` into memory.
pub fn load_data(local_path: &Path, file_name: &str) -> Result<Dataset, DataError> {
    let path = local_path.join(file_name);
    load_csv(&path)
}

/// Load a CSV file into memory.
pub fn load_csv(path: &Path) -> Result<Dataset, DataError> {
    let csv_err = |source: csv::Error| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if !path.is_file() {
        return Err(DataError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "CSV file not found"),
        ));
    }

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        return Err(DataError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let mut raw: Vec<csv::StringRecord> = Vec::new();
    for record in reader.records() {
        raw.push(record.map_err(csv_err)?);
    }

    let guessed: Vec<Vec<Value>> = raw
        .iter()
        .map(|rec| rec.iter().map(guess_value).collect())
        .collect();
    let dtypes: Vec<ColumnType> = (0..headers.len())
        .map(|c| infer_column_type(guessed.iter().map(|r| &r[c])))
        .collect();

    let rows: Vec<Vec<Value>> = raw
        .iter()
        .zip(guessed)
        .map(|(rec, cells)| {
            cells
                .into_iter()
                .zip(rec.iter())
                .zip(&dtypes)
                .map(|((cell, text), ty)| match (ty, cell) {
                    (_, Value::Null) => Value::Null,
                    (ColumnType::Str, _) => Value::Str(text.to_string()),
                    (ty, cell) => cell.coerce(*ty),
                })
                .collect()
        })
        .collect();

    log::debug!(
        "loaded {} rows x {} columns from {}",
        rows.len(),
        headers.len(),
        path.display()
    );

    Dataset::new(headers, rows).map_err(|source| DataError::Table {
        path: path.to_path_buf(),
        source,
    })
}

fn guess_value(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Str(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn infers_housing_column_types() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "housing.csv",
            "longitude,housing_median_age,total_bedrooms,median_income,ocean_proximity\n\
             -122.23,41.0,129,8.3252,NEAR BAY\n\
             -122.22,21.0,,8.3014,NEAR BAY\n\
             -121.24,52.0,190,7.2574,\"<1H OCEAN\"\n",
        );

        let ds = load_data(dir.path(), "housing.csv").unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.dtypes(),
            &[
                ColumnType::Float,
                ColumnType::Float,
                ColumnType::Float,
                ColumnType::Float,
                ColumnType::Str
            ]
        );
        assert_eq!(ds.get(1, "total_bedrooms"), Some(&Value::Null));
        assert_eq!(ds.get(0, "total_bedrooms"), Some(&Value::Float(129.0)));
        assert_eq!(
            ds.get(2, "ocean_proximity"),
            Some(&Value::Str("<1H OCEAN".into()))
        );
    }

    #[test]
    fn integer_columns_stay_integers() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "ids.csv", "id,code\n1,007\n2,x12\n");

        let ds = load_data(dir.path(), "ids.csv").unwrap();
        assert_eq!(ds.dtype("id"), Some(ColumnType::Int));
        assert_eq!(ds.dtype("code"), Some(ColumnType::Str));
        // Text columns keep the original spelling.
        assert_eq!(ds.get(0, "code"), Some(&Value::Str("007".into())));
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_data(dir.path(), "absent.csv").unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "bad.csv", "a,b\n1,2\n3\n");
        let err = load_data(dir.path(), "bad.csv").unwrap_err();
        assert!(matches!(err, DataError::Csv { .. }), "got {err:?}");
    }

    #[test]
    fn header_only_file_is_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "empty.csv", "a,b\n");
        let ds = load_data(dir.path(), "empty.csv").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.columns(), &["a".to_string(), "b".to_string()]);
    }
}
