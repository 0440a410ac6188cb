//! Image decoding and on-disk mirroring infrastructure.

pub mod decoder;
pub mod mirror;

pub use decoder::DefaultImageDecoder;
