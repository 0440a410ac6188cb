//! Errors surfaced by the [`crate::infrastructure::downloader::Downloader`].

use thiserror::Error;

/// Failure modes for downloader creation and per-call fetches.
#[derive(Debug, Error)]
pub enum DownloaderError {
    /// A required configuration value (the upstream URL) was missing.
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// The configured cache directory does not exist or is not a directory.
    #[error("cache directory unavailable: {0}")]
    CacheDirUnavailable(String),

    /// The HTTP request failed or returned a non-success status.
    #[error("download failed: {0}")]
    DownloadFailure(String),

    /// The response body could not be decoded into an image.
    #[error("decode failed: {0}")]
    DecodeFailure(String),

    /// The HTTP client could not be constructed.
    #[error("resource exhaustion building HTTP client: {0}")]
    ResourceExhaustion(String),
}
