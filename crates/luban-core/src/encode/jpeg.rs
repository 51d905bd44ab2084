//! JPEG encoding.
//!
//! Wraps the `image` crate's baseline JPEG encoder. The compressor works with
//! a fractional quality factor in (0, 1]; [`encode_jpeg_quality`] maps it onto
//! the encoder's integer 1-100 scale.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur while encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder rejected the input
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Animation frames do not share one canvas size
    #[error("Frame {index} is {actual:?}, expected {expected:?}")]
    FrameSizeMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// An animation needs at least one frame
    #[error("Cannot encode an animation without frames")]
    NoFrames,
}

/// Map a fractional quality factor onto the JPEG encoder's 1-100 scale.
///
/// Non-finite input is treated as full quality.
pub fn quality_to_jpeg_scale(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 100;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode a decoded raster at a fractional quality factor in (0, 1].
pub fn encode_jpeg_quality(image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
    encode_jpeg(
        &image.pixels,
        image.width,
        image.height,
        quality_to_jpeg_scale(quality),
    )
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, clamped)
///
/// # Example
///
/// ```ignore
/// use luban_core::encode::encode_jpeg;
///
/// let pixels = vec![128u8; 100 * 100 * 3];
/// let jpeg = encode_jpeg(&pixels, 100, 100, 90).unwrap();
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
