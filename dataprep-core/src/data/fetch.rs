//! Fetcher: download an archive into a local directory and extract it.
//!
//! The local directory doubles as the cache. If it already exists the fetch
//! is skipped, with no check that its contents are complete or current. A
//! fetch that fails midway leaves the directory behind, and the next call
//! will treat it as fetched. Delete the directory to force a fresh download.

use super::archive;
use super::provider::{ArchiveSource, DataError};
use std::fs;
use std::path::{Path, PathBuf};

/// What `fetch_data` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The local directory existed, nothing was downloaded.
    AlreadyPresent,
    /// The archive was downloaded and extracted.
    Fetched {
        archive: PathBuf,
        bytes: u64,
        entries: usize,
    },
}

impl FetchOutcome {
    pub fn downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Fetched { .. })
    }
}

/// Ensure `local_path` exists and holds the extracted contents of `url`.
///
/// Downloads to `local_path/archive_name`, then extracts every member into
/// `local_path`. The archive file is left in place.
pub fn fetch_data(
    source: &dyn ArchiveSource,
    url: &str,
    local_path: &Path,
    archive_name: &str,
) -> Result<FetchOutcome, DataError> {
    if local_path.is_dir() {
        log::info!("{} already present, skipping fetch", local_path.display());
        log::warn!(
            "contents of {} are not verified against {url}",
            local_path.display()
        );
        return Ok(FetchOutcome::AlreadyPresent);
    }

    fs::create_dir_all(local_path).map_err(|e| DataError::io(local_path, e))?;
    let archive_path = local_path.join(archive_name);

    log::info!("fetching {url} via {}", source.name());
    let bytes = source.download(url, &archive_path)?;
    let entries = archive::extract_all(&archive_path, local_path)?;
    log::info!(
        "extracted {entries} member(s) from {} into {}",
        archive_path.display(),
        local_path.display()
    );

    Ok(FetchOutcome::Fetched {
        archive: archive_path,
        bytes,
        entries,
    })
}
