//! Archive source trait and structured error types.
//!
//! The `ArchiveSource` trait abstracts over where an archive's bytes come from
//! (HTTP in production, an in-memory fixture in tests) so the fetcher can be
//! exercised without network access.

use crate::dataset::DatasetError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structured error types for fetch, extraction, and load operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot extract archive {}: {reason}", path.display())]
    Archive { path: PathBuf, reason: String },

    #[error("malformed CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV {} has no header row", path.display())]
    EmptyCsv { path: PathBuf },

    #[error("invalid table in {}: {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },
}

impl DataError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Where archive bytes come from.
///
/// Implementations write the resource at `url` to `dest` and return the number
/// of bytes written. They neither retry nor clean up a partially written file.
pub trait ArchiveSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Download `url` into the file at `dest`, creating or truncating it.
    fn download(&self, url: &str, dest: &Path) -> Result<u64, DataError>;
}
