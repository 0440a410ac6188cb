//! Errors surfaced by the [`crate::infrastructure::prefetcher::Prefetcher`].

use thiserror::Error;

/// Failure modes for prefetcher creation and startup.
///
/// Runtime downloader failures are *not* represented here: the worker logs
/// and retries them internally (see `SPEC_FULL.md` §4.2), so they never
/// reach a caller as an `Err`.
#[derive(Debug, Error)]
pub enum PrefetcherError {
    /// The ring mutex/condvar pair, or the ring allocation itself, could not
    /// be constructed.
    #[error("resource exhaustion initializing prefetcher: {0}")]
    ResourceExhaustion(String),
}
