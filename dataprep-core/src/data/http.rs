//! HTTP archive source.
//!
//! Blocking GET with no request timeout and no retries: a failed download is
//! fatal and a hung server blocks the caller.

use super::provider::{ArchiveSource, DataError};
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Downloads archives over HTTP(S) with a blocking reqwest client.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .user_agent(concat!("dataprep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl ArchiveSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64, DataError> {
        let mut resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let mut file = File::create(dest).map_err(|e| DataError::io(dest, e))?;
        let bytes = resp
            .copy_to(&mut file)
            .map_err(|e| DataError::NetworkUnreachable(format!("reading body of {url}: {e}")))?;
        log::debug!("downloaded {bytes} bytes from {url}");
        Ok(bytes)
    }
}
