//! In-memory tabular data: typed cells, the `Dataset` table, and its reports.

pub mod frame;
pub mod summary;
pub mod value;

pub use frame::{Dataset, DatasetError};
pub use summary::{ColumnInfo, ColumnStats, DatasetInfo, Description};
pub use value::{ColumnType, Value};
