//! The encode/decode capability the compressor is written against.
//!
//! The compression algorithms only ever call through [`ImageCodec`], so the
//! quality search and downscaling loops are independent of which encoder
//! produces the bytes. [`JpegCodec`] is the default binding over the `image`
//! crate.

use crate::decode::{self, AnimationFrame, DecodeError, DecodedImage, FilterType};
use crate::encode::{self, EncodeError};

/// Quantizer speed used when a codec is built without a config.
pub const DEFAULT_GIF_SPEED: i32 = 10;

/// Encode and decode operations consumed by the compressor.
pub trait ImageCodec {
    /// Encode a raster at a quality factor in (0, 1].
    fn encode(&self, image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError>;

    /// Decode bytes to an upright RGB raster.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;

    /// Decode bytes directly to a raster whose long edge is at most `max_edge`.
    fn thumbnail(&self, bytes: &[u8], max_edge: u32) -> Result<DecodedImage, DecodeError> {
        let image = self.decode(bytes)?;
        decode::resize_to_fit(&image, max_edge, self.filter())
    }

    /// Resize a raster to exact dimensions.
    fn resize(
        &self,
        image: &DecodedImage,
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError> {
        decode::resize(image, width, height, self.filter())
    }

    /// Encode a frame sequence as an animation.
    fn encode_animation(&self, frames: &[AnimationFrame]) -> Result<Vec<u8>, EncodeError> {
        encode::encode_gif(frames, DEFAULT_GIF_SPEED)
    }

    /// Decode every frame of an animation.
    fn decode_animation(&self, bytes: &[u8]) -> Result<Vec<AnimationFrame>, DecodeError> {
        decode::decode_gif_frames(bytes)
    }

    /// Resampling filter used by the default resize helpers.
    fn filter(&self) -> FilterType {
        FilterType::default()
    }
}

/// JPEG for stills and GIF for animations, both through the `image` crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JpegCodec {
    filter: FilterType,
    gif_speed: i32,
}

impl JpegCodec {
    pub fn new(filter: FilterType, gif_speed: i32) -> Self {
        Self { filter, gif_speed }
    }
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::new(FilterType::default(), DEFAULT_GIF_SPEED)
    }
}

impl ImageCodec for JpegCodec {
    fn encode(&self, image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
        encode::encode_jpeg_quality(image, quality)
    }

    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        decode::decode_image(bytes)
    }

    fn encode_animation(&self, frames: &[AnimationFrame]) -> Result<Vec<u8>, EncodeError> {
        encode::encode_gif(frames, self.gif_speed)
    }

    fn filter(&self) -> FilterType {
        self.filter
    }
}

impl<C: ImageCodec + ?Sized> ImageCodec for &C {
    fn encode(&self, image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(image, quality)
    }

    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        (**self).decode(bytes)
    }

    fn thumbnail(&self, bytes: &[u8], max_edge: u32) -> Result<DecodedImage, DecodeError> {
        (**self).thumbnail(bytes, max_edge)
    }

    fn resize(
        &self,
        image: &DecodedImage,
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError> {
        (**self).resize(image, width, height)
    }

    fn encode_animation(&self, frames: &[AnimationFrame]) -> Result<Vec<u8>, EncodeError> {
        (**self).encode_animation(frames)
    }

    fn decode_animation(&self, bytes: &[u8]) -> Result<Vec<AnimationFrame>, DecodeError> {
        (**self).decode_animation(bytes)
    }

    fn filter(&self) -> FilterType {
        (**self).filter()
    }
}
