//! Thin coordinator binding configuration to a running prefetch pipeline.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use crate::domain::entities::Image;
use crate::domain::ports::ImageDecoder;
use crate::infrastructure::config::RemoteImageListConfig;
use crate::infrastructure::image::DefaultImageDecoder;
use crate::infrastructure::prefetcher::Prefetcher;
use crate::infrastructure::Downloader;

/// How long [`RemoteImageList::scan`] waits for the first prefetched image
/// before giving up and falling back to the placeholder (or `None`).
const FIRST_IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// The three states `current()` can report.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentImage {
    /// The ring has a live image at the read cursor.
    Owned(Image),
    /// No image is available yet; showing the configured placeholder.
    Placeholder(Image),
    /// No image and no placeholder configured.
    None,
}

/// Movement verbs a viewer can request. Only `NextFile`/`PrevFile` are
/// meaningful for this source; the others are part of the generic
/// image-list shape and always return `false` here (`SPEC_FULL.md` §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpDirection {
    /// Jump to the first image (not supported by this source).
    First,
    /// Jump to the last image (not supported by this source).
    Last,
    /// Advance to the next unseen or most-recently-viewed image.
    NextFile,
    /// Step back to the previously viewed image.
    PrevFile,
    /// Jump to the next directory (not supported by this source).
    NextDir,
    /// Jump to the previous directory (not supported by this source).
    PrevDir,
}

/// Coordinates a [`Downloader`] and a [`Prefetcher`] to serve a viewer's
/// movement requests over a remote image source.
pub struct RemoteImageList {
    config: RemoteImageListConfig,
    decoder: Arc<dyn ImageDecoder>,
    prefetcher: Option<Prefetcher<Image>>,
    downloader: Option<Arc<std::sync::Mutex<Downloader>>>,
    placeholder: Option<Image>,
    current: Option<Image>,
}

impl RemoteImageList {
    /// Stores `config` without opening any network or disk resource yet.
    #[must_use]
    pub fn new(config: RemoteImageListConfig) -> Self {
        Self {
            config,
            decoder: Arc::new(DefaultImageDecoder),
            prefetcher: None,
            downloader: None,
            placeholder: None,
            current: None,
        }
    }

    /// Builds the downloader and prefetcher from the stored configuration
    /// and starts the background worker.
    ///
    /// Returns `false` on any configuration or resource failure (the
    /// pipeline never panics out of a bad config — see
    /// `DownloaderError`/`PrefetcherError`'s `ContractViolation` split in
    /// `SPEC_FULL.md` §7). On success, positions the read cursor on the
    /// first available image, waiting up to a bounded deadline.
    pub fn scan(&mut self) -> bool {
        if let Err(e) = self.config.validate() {
            error!(error = %e, "invalid remote image list configuration");
            return false;
        }

        if let Some(asset) = &self.config.no_image_asset {
            match load_placeholder(asset, self.decoder.as_ref()) {
                Ok(image) => self.placeholder = Some(image),
                Err(e) => warn!(path = %asset.display(), error = %e, "failed to load placeholder image"),
            }
        }

        let cache_dir = self.config.www_cache.clone();
        let downloader = match Downloader::create(
            self.config.www_url.clone(),
            cache_dir,
            self.config.www_save_to_file,
            self.config.www_cleanup_cache,
            Arc::clone(&self.decoder),
        ) {
            Ok(d) => Arc::new(std::sync::Mutex::new(d)),
            Err(e) => {
                error!(error = %e, "failed to create downloader");
                return false;
            }
        };

        let downloader_for_worker = Arc::clone(&downloader);
        let prefetcher = match Prefetcher::create(move || {
            downloader_for_worker
                .lock()
                .expect("downloader mutex is never held across a panic")
                .fetch_one()
        }) {
            Ok(p) => p,
            Err(e) => {
                error!(error = %e, "failed to create prefetcher");
                return false;
            }
        };

        if let Err(e) = prefetcher.start(self.config.www_cache_limit, self.config.www_prefetch_n) {
            error!(error = %e, "failed to start prefetcher");
            return false;
        }

        self.current = prefetcher.wait_for_first(FIRST_IMAGE_TIMEOUT);
        self.downloader = Some(downloader);
        self.prefetcher = Some(prefetcher);
        true
    }

    /// Reports the read cursor's current image, falling back to the
    /// placeholder, then to [`CurrentImage::None`].
    #[must_use]
    pub fn current(&self) -> CurrentImage {
        match (&self.current, &self.placeholder) {
            (Some(image), _) => CurrentImage::Owned(image.clone()),
            (None, Some(placeholder)) => CurrentImage::Placeholder(placeholder.clone()),
            (None, None) => CurrentImage::None,
        }
    }

    /// Applies a movement verb, updating the cursor and returning whether
    /// it moved.
    pub fn jump(&mut self, direction: JumpDirection) -> bool {
        let Some(prefetcher) = &self.prefetcher else {
            return false;
        };

        let next = match direction {
            JumpDirection::NextFile => prefetcher.jump_next(),
            JumpDirection::PrevFile => prefetcher.jump_prev(),
            JumpDirection::First | JumpDirection::Last => None,
            JumpDirection::NextDir | JumpDirection::PrevDir => None,
        };

        match direction {
            JumpDirection::First
            | JumpDirection::Last
            | JumpDirection::NextDir
            | JumpDirection::PrevDir => false,
            JumpDirection::NextFile | JumpDirection::PrevFile => {
                let moved = next.is_some();
                if moved {
                    self.current = next;
                }
                moved
            }
        }
    }
}

impl Drop for RemoteImageList {
    fn drop(&mut self) {
        // Order matters: the prefetcher's worker thread must be joined
        // before the downloader it calls into is dropped.
        self.prefetcher.take();
        self.downloader.take();
        self.placeholder.take();
    }
}

fn load_placeholder(
    path: &std::path::Path,
    decoder: &dyn ImageDecoder,
) -> Result<Image, std::io::Error> {
    let bytes = std::fs::read(path)?;
    decoder
        .decode(&bytes, &path.display().to_string())
        .map_err(std::io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_fails_without_a_url() {
        let mut list = RemoteImageList::new(RemoteImageListConfig::default());
        assert!(!list.scan());
    }

    #[test]
    fn jump_without_scan_returns_false() {
        let mut list = RemoteImageList::new(RemoteImageListConfig {
            www_url: "http://example.invalid/img".into(),
            ..Default::default()
        });
        assert!(!list.jump(JumpDirection::NextFile));
        assert_eq!(list.current(), CurrentImage::None);
    }

    #[test]
    fn unsupported_directions_never_move() {
        let mut list = RemoteImageList::new(RemoteImageListConfig {
            www_url: "http://example.invalid/img".into(),
            ..Default::default()
        });
        assert!(!list.jump(JumpDirection::First));
        assert!(!list.jump(JumpDirection::Last));
        assert!(!list.jump(JumpDirection::NextDir));
        assert!(!list.jump(JumpDirection::PrevDir));
    }

    #[test]
    fn drop_without_scan_is_safe() {
        let list = RemoteImageList::new(RemoteImageListConfig::default());
        drop(list);
    }
}
