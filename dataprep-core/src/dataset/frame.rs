//! The in-memory table: named, typed columns over row-major cells.

use super::value::{infer_column_type, ColumnType, Value};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Errors from building or reshaping a [`Dataset`].
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("row {row} has {found} cells but the header has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("row index {index} out of range for dataset of {len} rows")]
    IndexOutOfRange { index: usize, len: usize },
}

/// An ordered sequence of rows sharing one header.
///
/// Every row has exactly one cell per column. Column types are fixed at
/// construction and carried through `take`, so subsets keep their parent's
/// dtypes even when a subset would infer differently on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    dtypes: Vec<ColumnType>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Build a dataset, inferring each column's type from its cells.
    ///
    /// Cells are then widened to their column's type (see [`Value::coerce`]).
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Value>>) -> Result<Self, DatasetError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(DatasetError::DuplicateColumn(name.clone()));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DatasetError::RowWidth {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        let dtypes: Vec<ColumnType> = (0..columns.len())
            .map(|c| infer_column_type(rows.iter().map(|r| &r[c])))
            .collect();
        for row in &mut rows {
            for (cell, ty) in row.iter_mut().zip(&dtypes) {
                *cell = std::mem::replace(cell, Value::Null).coerce(*ty);
            }
        }
        Ok(Self {
            columns,
            dtypes,
            rows,
        })
    }

    /// Build a dataset with explicit column types. Widths must already agree.
    pub(crate) fn from_parts(
        columns: Vec<String>,
        dtypes: Vec<ColumnType>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        debug_assert_eq!(columns.len(), dtypes.len());
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self {
            columns,
            dtypes,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn dtypes(&self) -> &[ColumnType] {
        &self.dtypes
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn dtype(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name).map(|i| self.dtypes[i])
    }

    /// Iterate over one column's cells in row order.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_, DatasetError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DatasetError::ColumnNotFound(name.to_string()))?;
        Ok(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Cell lookup by row position and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// New dataset holding the given rows, in the given order.
    pub fn take(&self, indices: &[usize]) -> Result<Self, DatasetError> {
        let mut rows = Vec::with_capacity(indices.len());
        for &index in indices {
            let row = self.rows.get(index).ok_or(DatasetError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            })?;
            rows.push(row.clone());
        }
        Ok(Self::from_parts(
            self.columns.clone(),
            self.dtypes.clone(),
            rows,
        ))
    }

    /// First `n` rows (fewer if the dataset is shorter).
    pub fn head(&self, n: usize) -> Self {
        Self::from_parts(
            self.columns.clone(),
            self.dtypes.clone(),
            self.rows.iter().take(n).cloned().collect(),
        )
    }

    /// Copy with a leading integer column holding each row's position.
    pub fn with_row_index(&self, name: &str) -> Result<Self, DatasetError> {
        if self.column_index(name).is_some() {
            return Err(DatasetError::DuplicateColumn(name.to_string()));
        }
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(name.to_string());
        columns.extend(self.columns.iter().cloned());

        let mut dtypes = Vec::with_capacity(self.dtypes.len() + 1);
        dtypes.push(ColumnType::Int);
        dtypes.extend(self.dtypes.iter().copied());

        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut out = Vec::with_capacity(row.len() + 1);
                out.push(Value::Int(i as i64));
                out.extend(row.iter().cloned());
                out
            })
            .collect();

        Ok(Self::from_parts(columns, dtypes, rows))
    }

    /// Copy with one extra trailing column.
    pub fn with_column(&self, name: &str, cells: Vec<Value>) -> Result<Self, DatasetError> {
        if self.column_index(name).is_some() {
            return Err(DatasetError::DuplicateColumn(name.to_string()));
        }
        if cells.len() != self.rows.len() {
            return Err(DatasetError::RowWidth {
                row: cells.len().min(self.rows.len()),
                expected: self.rows.len(),
                found: cells.len(),
            });
        }
        let dtype = infer_column_type(&cells);
        let cells: Vec<Value> = cells.into_iter().map(|v| v.coerce(dtype)).collect();
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        let mut dtypes = self.dtypes.clone();
        dtypes.push(dtype);
        let rows = self
            .rows
            .iter()
            .zip(cells)
            .map(|(row, cell)| {
                let mut out = row.clone();
                out.push(cell);
                out
            })
            .collect();
        Ok(Self::from_parts(columns, dtypes, rows))
    }

    /// Remove a column in place.
    pub fn drop_column(&mut self, name: &str) -> Result<(), DatasetError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DatasetError::ColumnNotFound(name.to_string()))?;
        self.columns.remove(idx);
        self.dtypes.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        Ok(())
    }
}

/// Aligned text table, one line per row, prefixed by the row position.
impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect())
            .collect();

        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                cells
                    .iter()
                    .map(|r| r[c].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, w) in self.columns.iter().zip(widths.iter().copied()) {
            write!(f, "  {name:>w$}")?;
        }
        writeln!(f)?;

        for (i, row) in cells.iter().enumerate() {
            write!(f, "{i:<index_width$}")?;
            for (cell, w) in row.iter().zip(widths.iter().copied()) {
                write!(f, "  {cell:>w$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["id".into(), "income".into(), "ocean".into()],
            vec![
                vec![Value::Int(10), Value::Float(1.5), "INLAND".into()],
                vec![Value::Int(11), Value::Float(3.2), "NEAR BAY".into()],
                vec![Value::Int(12), Value::Null, "ISLAND".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_infers_column_types() {
        let ds = sample();
        assert_eq!(
            ds.dtypes(),
            &[ColumnType::Int, ColumnType::Float, ColumnType::Str]
        );
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let err = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Int(1)]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::RowWidth {
                row: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn new_rejects_duplicate_columns() {
        let err = Dataset::new(vec!["a".into(), "a".into()], vec![]).unwrap_err();
        assert_eq!(err, DatasetError::DuplicateColumn("a".into()));
    }

    #[test]
    fn take_preserves_order_and_dtypes() {
        let ds = sample();
        let sub = ds.take(&[2, 0]).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.get(0, "id"), Some(&Value::Int(12)));
        assert_eq!(sub.get(1, "id"), Some(&Value::Int(10)));
        assert_eq!(sub.dtypes(), ds.dtypes());
    }

    #[test]
    fn take_out_of_range_fails() {
        let err = sample().take(&[5]).unwrap_err();
        assert_eq!(err, DatasetError::IndexOutOfRange { index: 5, len: 3 });
    }

    #[test]
    fn row_index_is_positional() {
        let ds = sample().with_row_index("index").unwrap();
        assert_eq!(ds.columns()[0], "index");
        let ids: Vec<_> = ds.column("index").unwrap().cloned().collect();
        assert_eq!(ids, vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
        assert!(ds.with_row_index("index").is_err());
    }

    #[test]
    fn add_then_drop_column_round_trips() {
        let ds = sample();
        let mut wider = ds
            .with_column("cat", vec![Value::Int(1), Value::Int(2), Value::Int(1)])
            .unwrap();
        assert_eq!(wider.dtype("cat"), Some(ColumnType::Int));
        wider.drop_column("cat").unwrap();
        assert_eq!(wider, ds);
        assert_eq!(
            wider.drop_column("cat"),
            Err(DatasetError::ColumnNotFound("cat".into()))
        );
    }

    #[test]
    fn display_renders_header_and_rows() {
        let text = sample().head(2).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("income"));
        assert!(lines[1].starts_with('0'));
        assert!(lines[2].contains("NEAR BAY"));
    }
}
