//! Port definitions for external collaborators.

mod image_decoder;

pub use image_decoder::{DecodeError, ImageDecoder};
