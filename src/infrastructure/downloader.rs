//! Synchronous HTTP downloader: one decoded [`Image`] per call.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::entities::Image;
use crate::domain::errors::DownloaderError;
use crate::domain::ports::ImageDecoder;
use crate::infrastructure::image::mirror;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a single fixed URL over HTTP, decodes the body, and optionally
/// mirrors it to disk.
///
/// Not `Sync`: the prefetcher guarantees every call comes from its single
/// worker thread, so the downloader never needs interior synchronization of
/// its own (`SPEC_FULL.md` §4.1 "Threading").
pub struct Downloader {
    url: String,
    cache_dir: Option<PathBuf>,
    save_to_file: bool,
    cleanup_after_use: bool,
    sequence: u64,
    client: reqwest::blocking::Client,
    decoder: Arc<dyn ImageDecoder>,
}

impl Downloader {
    /// Builds a downloader for `url`, optionally mirroring responses into
    /// `cache_dir`.
    ///
    /// `cache_dir` is validated whenever it is supplied, independent of
    /// `save_to_file`: `cleanup_after_use` can clear a cache directory even
    /// when per-response mirroring is disabled.
    ///
    /// # Errors
    /// Returns [`DownloaderError::MissingConfig`] if `url` is empty,
    /// [`DownloaderError::CacheDirUnavailable`] if `cache_dir` is set but
    /// not an existing, readable directory, or
    /// [`DownloaderError::ResourceExhaustion`] if the HTTP client cannot be
    /// constructed.
    pub fn create(
        url: impl Into<String>,
        cache_dir: Option<PathBuf>,
        save_to_file: bool,
        cleanup_after_use: bool,
        decoder: Arc<dyn ImageDecoder>,
    ) -> Result<Self, DownloaderError> {
        let url = url.into();
        if url.is_empty() {
            return Err(DownloaderError::MissingConfig("www_url"));
        }

        if let Some(dir) = &cache_dir {
            mirror::validate_cache_dir(dir)
                .map_err(|e| DownloaderError::CacheDirUnavailable(format!("{}: {e}", dir.display())))?;

            if cleanup_after_use {
                mirror::clear_cache_dir(dir);
            }
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DownloaderError::ResourceExhaustion(e.to_string()))?;

        Ok(Self {
            url,
            cache_dir,
            save_to_file,
            cleanup_after_use,
            sequence: 0,
            client,
            decoder,
        })
    }

    /// Performs one GET against the configured URL and returns the decoded
    /// image.
    ///
    /// The per-instance sequence counter advances on every call, including
    /// failed ones, so mirror filenames never collide.
    ///
    /// # Errors
    /// Returns [`DownloaderError::DownloadFailure`] on a transport error or
    /// non-success HTTP status, or [`DownloaderError::DecodeFailure`] if the
    /// response body cannot be decoded. Mirror write failures are logged and
    /// never returned.
    pub fn fetch_one(&mut self) -> Result<Image, DownloaderError> {
        let sequence = self.sequence;
        self.sequence += 1;

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DownloaderError::DownloadFailure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DownloaderError::DownloadFailure(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| DownloaderError::DownloadFailure(e.to_string()))?;

        if self.save_to_file
            && let Some(dir) = &self.cache_dir
        {
            mirror::write_mirror(dir, sequence, &bytes);
        }

        let image = self
            .decoder
            .decode(&bytes, &self.url)
            .map_err(|e| DownloaderError::DecodeFailure(e.reason))?;

        debug!(url = %self.url, sequence, bytes = bytes.len(), "fetched and decoded image");
        Ok(image)
    }
}

impl Drop for Downloader {
    fn drop(&mut self) {
        if self.cleanup_after_use
            && let Some(dir) = &self.cache_dir
        {
            mirror::clear_cache_dir(dir);
        }
    }
}

impl std::fmt::Debug for Downloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Downloader")
            .field("url", &self.url)
            .field("cache_dir", &self.cache_dir)
            .field("cleanup_after_use", &self.cleanup_after_use)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::image::DefaultImageDecoder;
    use tempfile::tempdir;

    fn decoder() -> Arc<dyn ImageDecoder> {
        Arc::new(DefaultImageDecoder)
    }

    #[test]
    fn create_rejects_empty_url() {
        let err = Downloader::create("", None, false, false, decoder()).unwrap_err();
        assert!(matches!(err, DownloaderError::MissingConfig(_)));
    }

    #[test]
    fn create_rejects_missing_cache_dir() {
        let err = Downloader::create(
            "http://example.invalid/img",
            Some(PathBuf::from("/nonexistent/path/for/sure")),
            false,
            false,
            decoder(),
        )
        .unwrap_err();
        assert!(matches!(err, DownloaderError::CacheDirUnavailable(_)));
    }

    #[test]
    fn cleanup_on_create_empties_cache_dir_but_preserves_subdirs() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("stale.jpg"), b"old").unwrap();
        std::fs::create_dir(dir.path().join("keep-me")).unwrap();

        let _downloader = Downloader::create(
            "http://example.invalid/img",
            Some(dir.path().to_path_buf()),
            true,
            true,
            decoder(),
        )
        .unwrap();

        assert!(!dir.path().join("stale.jpg").exists());
        assert!(dir.path().join("keep-me").exists());
    }

    #[test]
    fn cleanup_runs_even_when_mirroring_is_disabled() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("stale.jpg"), b"old").unwrap();

        let _downloader = Downloader::create(
            "http://example.invalid/img",
            Some(dir.path().to_path_buf()),
            false,
            true,
            decoder(),
        )
        .unwrap();

        assert!(!dir.path().join("stale.jpg").exists());
    }
}
