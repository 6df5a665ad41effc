use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Server returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{url} is larger than the {limit} byte limit")]
    TooLarge { url: String, limit: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of remote bytes for media sideloading.
///
/// Production code uses [`HttpDownloader`]; tests inject canned responses.
pub trait Downloader: Send + Sync {
    fn download(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// Largest media file accepted by default
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// Blocking HTTP downloader
pub struct HttpDownloader {
    client: Client,
    max_bytes: u64,
}

impl HttpDownloader {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("pageport/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            max_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
        })
    }

    /// Refuse bodies larger than `max_bytes`
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(FetchError::TooLarge {
                url: url.to_string(),
                limit: self.max_bytes,
            });
        }

        read_capped(response, url, self.max_bytes)
    }
}

/// Read a whole body, failing once it grows past `limit` bytes
fn read_capped<R: Read>(reader: R, url: &str, limit: u64) -> Result<Vec<u8>, FetchError> {
    let mut bytes = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Io(e)
            }
        })?;

    if bytes.len() as u64 > limit {
        return Err(FetchError::TooLarge {
            url: url.to_string(),
            limit,
        });
    }
    Ok(bytes)
}
