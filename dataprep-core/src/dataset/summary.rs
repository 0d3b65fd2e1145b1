//! Column/type summary and descriptive statistics.

use super::frame::Dataset;
use super::value::ColumnType;
use std::collections::BTreeMap;
use std::fmt;

/// One line of the `info()` report.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: ColumnType,
}

/// Shape and per-column types of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub entries: usize,
    pub columns: Vec<ColumnInfo>,
}

impl DatasetInfo {
    /// Number of columns per dtype, keyed by dtype name.
    pub fn dtype_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for col in &self.columns {
            *counts.entry(col.dtype.name()).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for DatasetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries == 0 {
            writeln!(f, "RangeIndex: 0 entries")?;
        } else {
            writeln!(
                f,
                "RangeIndex: {} entries, 0 to {}",
                self.entries,
                self.entries - 1
            )?;
        }
        writeln!(f, "Data columns (total {} columns):", self.columns.len())?;
        let width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max("Column".len());
        writeln!(f, " #   {:<width$}  Non-Null Count  Dtype", "Column")?;
        for (i, col) in self.columns.iter().enumerate() {
            let count = format!("{} non-null", col.non_null);
            writeln!(f, " {i:<3} {:<width$}  {count:<14}  {}", col.name, col.dtype)?;
        }
        let tally: Vec<String> = self
            .dtype_counts()
            .into_iter()
            .map(|(name, n)| format!("{name}({n})"))
            .collect();
        writeln!(f, "dtypes: {}", tally.join(", "))
    }
}

/// Descriptive statistics of one numeric column. Nulls are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1). NaN below two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    fn from_values(name: &str, mut values: Vec<f64>) -> Self {
        values.sort_by(|a, b| a.total_cmp(b));
        let count = values.len();
        if count == 0 {
            return Self {
                name: name.to_string(),
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            f64::NAN
        } else {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        };
        Self {
            name: name.to_string(),
            count,
            mean,
            std,
            min: values[0],
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values[count - 1],
        }
    }
}

/// Linear-interpolated quantile of sorted, non-empty values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// `describe()` output: statistics for every numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub columns: Vec<ColumnStats>,
}

impl Description {
    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: [(&str, fn(&ColumnStats) -> f64); 8] = [
            ("count", |s| s.count as f64),
            ("mean", |s| s.mean),
            ("std", |s| s.std),
            ("min", |s| s.min),
            ("25%", |s| s.q25),
            ("50%", |s| s.median),
            ("75%", |s| s.q75),
            ("max", |s| s.max),
        ];
        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| c.name.len().max(12))
            .collect();

        write!(f, "{:5}", "")?;
        for (col, w) in self.columns.iter().zip(widths.iter().copied()) {
            write!(f, "  {:>w$}", col.name)?;
        }
        writeln!(f)?;
        for (label, stat) in rows {
            write!(f, "{label:<5}")?;
            for (col, w) in self.columns.iter().zip(widths.iter().copied()) {
                write!(f, "  {:>w$.6}", stat(col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Dataset {
    /// Column names, non-null counts, and dtypes.
    pub fn info(&self) -> DatasetInfo {
        let columns = self
            .columns()
            .iter()
            .zip(self.dtypes())
            .enumerate()
            .map(|(c, (name, dtype))| ColumnInfo {
                name: name.clone(),
                non_null: self.rows().iter().filter(|r| !r[c].is_null()).count(),
                dtype: *dtype,
            })
            .collect();
        DatasetInfo {
            entries: self.len(),
            columns,
        }
    }

    /// Descriptive statistics over the numeric columns.
    pub fn describe(&self) -> Description {
        let columns = self
            .columns()
            .iter()
            .zip(self.dtypes())
            .enumerate()
            .filter(|(_, (_, dtype))| dtype.is_numeric())
            .map(|(c, (name, _))| {
                let values = self
                    .rows()
                    .iter()
                    .filter_map(|r| r[c].as_f64())
                    .filter(|v| !v.is_nan())
                    .collect();
                ColumnStats::from_values(name, values)
            })
            .collect();
        Description { columns }
    }
}
