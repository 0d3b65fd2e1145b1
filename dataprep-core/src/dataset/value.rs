//! Cell values and column types.

use std::fmt;

/// A single cell in a [`Dataset`](super::Dataset).
///
/// Mirrors the dtypes a CSV column can take after inference: integers,
/// floats, free text, and missing cells.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl Value {
    /// Numeric view of the value. `Str` and `Null` have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(_) | Value::Null => None,
        }
    }

    /// Exact conversion to a 64-bit integer.
    ///
    /// Floats convert only when finite, integral, and inside the `i64` range.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => {
                // 2^63 is exactly representable; anything at or above it overflows.
                const LIMIT: f64 = 9_223_372_036_854_775_808.0;
                if f.is_finite() && f.fract() == 0.0 && *f >= -LIMIT && *f < LIMIT {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            Value::Str(_) | Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert the cell to fit a column of type `ty`.
    ///
    /// Only widening conversions happen: ints become floats in a float
    /// column, and numbers become text in a text column. Nulls stay null.
    pub fn coerce(self, ty: ColumnType) -> Value {
        match (self, ty) {
            (Value::Int(i), ColumnType::Float) => Value::Float(i as f64),
            (Value::Int(i), ColumnType::Str) => Value::Str(i.to_string()),
            (Value::Float(v), ColumnType::Str) => Value::Str(v.to_string()),
            (other, _) => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Null => write!(f, "NaN"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

/// Inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    Float,
    Str,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }

    /// Name used in the `info()` report.
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Int => "int64",
            ColumnType::Float => "float64",
            ColumnType::Str => "object",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Infer the type of a column from its cells.
///
/// Nulls are ignored, except that an integer column holding a null widens to
/// `Float`. A column of only nulls is `Float`.
pub fn infer_column_type<'a>(cells: impl IntoIterator<Item = &'a Value>) -> ColumnType {
    let mut saw_float = false;
    let mut saw_null = false;
    for cell in cells {
        match cell {
            Value::Int(_) => {}
            Value::Float(_) => saw_float = true,
            Value::Null => saw_null = true,
            Value::Str(_) => return ColumnType::Str,
        }
    }
    if saw_float || saw_null {
        ColumnType::Float
    } else {
        ColumnType::Int
    }
}
