//! Dataprep Core: fetch a tabular dataset, load it, and split it for training.
//!
//! This crate contains:
//! - Fetcher: download a tar(.gz) archive into a cache directory and extract it
//! - Loader: parse a CSV file into a typed in-memory `Dataset`
//! - Splitters: random, hash-stable by identifier, and stratified by a binned column
//! - Reports: `head`, `info`, and `describe` summaries of a dataset
//! - Configuration for the whole pipeline, loadable from TOML

pub mod config;
pub mod data;
pub mod dataset;
pub mod split;

pub use config::{ConfigError, PrepConfig};
pub use data::{fetch_data, load_data, DataError, FetchOutcome};
pub use dataset::{Dataset, Value};
pub use split::{Split, SplitError, SplitIndices, Splitter};
