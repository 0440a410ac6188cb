//! The opaque image handle moved through the prefetch pipeline.

use std::sync::Arc;

/// A decoded image, owned by whichever ring slot currently holds it.
///
/// The prefetch core never inspects pixel data; it only moves this handle
/// between the downloader, the ring, and the facade. Cloning is cheap (an
/// `Arc` bump) because the ring hands out shared references to the reader
/// without giving up its own ownership of the slot contents.
#[derive(Debug, Clone)]
pub struct Image(Arc<image::DynamicImage>);

impl Image {
    /// Wraps a freshly decoded image.
    #[must_use]
    pub fn new(decoded: image::DynamicImage) -> Self {
        Self(Arc::new(decoded))
    }

    /// Borrows the decoded pixel buffer.
    #[must_use]
    pub fn decoded(&self) -> &image::DynamicImage {
        &self.0
    }

    /// Returns the number of live references to this image's backing data.
    ///
    /// Exposed for tests that need to assert a slot's occupant was actually
    /// dropped on eviction rather than merely overwritten while still
    /// referenced elsewhere.
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
