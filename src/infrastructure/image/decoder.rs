//! Default format-sniffing [`ImageDecoder`] backed by the `image` crate.

use crate::domain::entities::Image;
use crate::domain::ports::{DecodeError, ImageDecoder};

/// Decodes PNG/JPEG/WebP bodies using `image::load_from_memory`.
///
/// This stands in for the viewer's real pluggable per-format registry
/// (out of scope for this crate, per `SPEC_FULL.md` §1); it is enough to
/// exercise the downloader end to end.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultImageDecoder;

impl ImageDecoder for DefaultImageDecoder {
    fn decode(&self, bytes: &[u8], display_name: &str) -> Result<Image, DecodeError> {
        image::load_from_memory(bytes)
            .map(Image::new)
            .map_err(|e| DecodeError {
                display_name: display_name.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_valid_png() {
        let mut bytes = Vec::new();
        image::DynamicImage::new_rgb8(4, 4)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let decoder = DefaultImageDecoder;
        let image = decoder.decode(&bytes, "test.png").unwrap();
        assert_eq!(image.decoded().width(), 4);
    }

    #[test]
    fn rejects_garbage_bytes() {
        let decoder = DefaultImageDecoder;
        let err = decoder.decode(b"not an image", "garbage.bin").unwrap_err();
        assert_eq!(err.display_name, "garbage.bin");
    }
}
