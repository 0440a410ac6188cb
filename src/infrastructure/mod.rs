//! Infrastructure layer: external-facing adapters the domain ports describe.

/// Configuration loading and persistence.
pub mod config;
/// Synchronous HTTP downloader.
pub mod downloader;
/// Image decoding and on-disk mirroring.
pub mod image;
/// Bounded cyclic buffer and background prefetch worker.
pub mod prefetcher;

pub use config::{ImageSource, RemoteImageListConfig, StorageManager};
pub use downloader::Downloader;
pub use image::DefaultImageDecoder;
pub use prefetcher::Prefetcher;
