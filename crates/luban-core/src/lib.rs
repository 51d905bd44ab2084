//! Luban Core - size-targeted image compression
//!
//! This crate provides the compression engine behind Luban: fitting JPEG
//! stills under a byte budget, sizing photos by Luban size classes, and
//! shrinking animated GIFs by frame subsampling and downscaling.
//!
//! All encoding goes through the [`ImageCodec`] trait, so the search and
//! downscaling loops can run against any encoder. [`JpegCodec`] is the
//! default binding over the `image` crate.

pub mod codec;
pub mod compress;
pub mod config;
pub mod decode;
pub mod encode;

#[cfg(test)]
mod test_support;

pub use codec::{ImageCodec, JpegCodec};
pub use compress::{
    compress_animated_sequence, compress_by_heuristic, compress_to_max_size,
    AnimatedCompressionResult, CompressError, Compressed, CompressionConstraint,
    CompressionResult, Compressor, Outcome,
};
pub use config::{CompressionConfig, HeuristicPreset};
pub use decode::{AnimationFrame, DecodedImage, FilterType, ImageKind};
