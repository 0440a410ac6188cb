//! remote-image-prefetch - a background prefetch pipeline for a remote
//! image source.
//!
//! Three layers, bottom-up: a synchronous HTTP [`Downloader`], a
//! [`Prefetcher`] that runs it on a worker thread behind a bounded cyclic
//! ring, and a [`RemoteImageList`] facade that binds configuration to both
//! and exposes cursor-based navigation to a viewer.
//!
//! [`Downloader`]: infrastructure::Downloader
//! [`Prefetcher`]: infrastructure::Prefetcher
//! [`RemoteImageList`]: application::RemoteImageList

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer: the facade a viewer drives.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing the downloader, prefetcher, and config.
pub mod infrastructure;

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name, used in the default configuration directory.
pub const NAME: &str = "remote-image-prefetch";
