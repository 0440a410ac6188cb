//! Port definition for the pluggable per-format image decoder.

use crate::domain::entities::Image;

/// Error returned when a byte buffer cannot be decoded into an [`Image`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to decode {display_name}: {reason}")]
pub struct DecodeError {
    /// Name shown in diagnostics (typically the source URL).
    pub display_name: String,
    /// Underlying decoder failure message.
    pub reason: String,
}

/// Decodes an in-memory response body into an owned [`Image`].
///
/// This is the seam the viewer's real per-format decoder registry plugs
/// into; the prefetch core only calls through it and never depends on a
/// specific image format or decoding library directly. Implementations must
/// be safe to call from the prefetcher's worker thread.
pub trait ImageDecoder: Send + Sync {
    /// Decodes `bytes`, using `display_name` only for error messages.
    fn decode(&self, bytes: &[u8], display_name: &str) -> Result<Image, DecodeError>;
}
