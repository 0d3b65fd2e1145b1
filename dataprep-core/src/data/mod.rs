//! Data acquisition: fetching archives and loading CSV files.

pub mod archive;
pub mod fetch;
pub mod http;
pub mod loader;
pub mod provider;

pub use fetch::{fetch_data, FetchOutcome};
pub use http::HttpSource;
pub use loader::{load_csv, load_data};
pub use provider::{ArchiveSource, DataError};
