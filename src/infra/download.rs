//! HTTP fetching and in-memory zip extraction
//!
//! Archives are fetched with a single attempt and never touch the disk: the
//! requested entry is read out of the response body directly.

use std::io::{Cursor, Read};
use std::time::Duration;

use crate::core::resolver::ArchiveFetcher;
use crate::error::{ArchiveError, DownloadError};

/// Single-attempt HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a new fetcher
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(300))
                .connect_timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::NetworkError {
                url: url.to_string(),
                error: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DownloadError::NetworkError {
                url: url.to_string(),
                error: format!("HTTP {}", response.status()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::NetworkError {
                url: url.to_string(),
                error: e.to_string(),
            })?;

        tracing::debug!("Fetched {} bytes from {url}", body.len());
        Ok(body.to_vec())
    }
}

/// Read one named entry out of a zip archive held in memory
///
/// `url` only labels errors.
pub fn read_zip_entry(url: &str, data: Vec<u8>, entry: &str) -> Result<Vec<u8>, ArchiveError> {
    let malformed = |e: &dyn std::fmt::Display| ArchiveError::Malformed {
        url: url.to_string(),
        error: e.to_string(),
    };

    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| malformed(&e))?;

    let mut file = match archive.by_name(entry) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ArchiveError::EntryNotFound {
                url: url.to_string(),
                entry: entry.to_string(),
            })
        }
        Err(e) => return Err(malformed(&e)),
    };

    let mut content = Vec::new();
    file.read_to_end(&mut content).map_err(|e| malformed(&e))?;
    Ok(content)
}
