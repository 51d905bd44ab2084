//! Fixtures shared by unit tests across modules.

use std::cell::Cell;
use std::time::Duration;

use crate::codec::ImageCodec;
use crate::decode::{AnimationFrame, DecodeError, DecodedImage};
use crate::encode::{encode_jpeg, EncodeError};

/// Deterministic pseudo-random RGB raster (xorshift), hard for JPEG to squeeze.
pub(crate) fn noise_image(width: u32, height: u32, seed: u32) -> DecodedImage {
    let mut state = seed.max(1);
    let len = (width as usize) * (height as usize) * 3;
    let pixels = (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    DecodedImage::new(width, height, pixels)
}

/// Noise raster encoded at maximum JPEG quality.
pub(crate) fn noisy_jpeg(width: u32, height: u32) -> Vec<u8> {
    let image = noise_image(width, height, 7);
    encode_jpeg(&image.pixels, width, height, 100).unwrap()
}

/// Uniform-duration RGBA frames with distinct noise in each.
pub(crate) fn noise_frames(count: usize, width: u32, height: u32, delay_ms: u64) -> Vec<AnimationFrame> {
    (0..count)
        .map(|i| {
            let rgb = noise_image(width, height, i as u32 + 1);
            let rgba = rgb
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect();
            AnimationFrame::new(
                image::RgbaImage::from_raw(width, height, rgba).unwrap(),
                Duration::from_millis(delay_ms),
            )
        })
        .collect()
}

/// Codec whose output size is an exact function of pixel count and quality:
/// `header + ceil(pixels * bytes_per_pixel * quality)`.
///
/// Animations cost `header + pixels * bytes_per_pixel` per frame. Counts
/// every encode so tests can assert on the number of attempts.
pub(crate) struct SizeModelCodec {
    pub header: usize,
    pub bytes_per_pixel: f64,
    pub encodes: Cell<usize>,
}

impl SizeModelCodec {
    pub(crate) fn new(header: usize, bytes_per_pixel: f64) -> Self {
        Self {
            header,
            bytes_per_pixel,
            encodes: Cell::new(0),
        }
    }

    pub(crate) fn size_for(&self, width: u32, height: u32, quality: f32) -> usize {
        let pixels = width as f64 * height as f64;
        self.header + (pixels * self.bytes_per_pixel * quality as f64).ceil() as usize
    }
}

impl ImageCodec for SizeModelCodec {
    fn encode(&self, image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
        if image.width == 0 || image.height == 0 {
            return Err(EncodeError::InvalidDimensions {
                width: image.width,
                height: image.height,
            });
        }
        self.encodes.set(self.encodes.get() + 1);
        Ok(vec![0xAB; self.size_for(image.width, image.height, quality)])
    }

    fn decode(&self, _bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        Err(DecodeError::InvalidFormat)
    }

    /// Skips resampling; only the dimensions matter to the size model.
    fn resize(
        &self,
        _image: &DecodedImage,
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidFormat);
        }
        let len = (width as usize) * (height as usize) * 3;
        Ok(DecodedImage::new(width, height, vec![0; len]))
    }

    fn encode_animation(&self, frames: &[AnimationFrame]) -> Result<Vec<u8>, EncodeError> {
        if frames.is_empty() {
            return Err(EncodeError::NoFrames);
        }
        self.encodes.set(self.encodes.get() + 1);
        let size: usize = frames
            .iter()
            .map(|f| {
                let (w, h) = f.dimensions();
                self.size_for(w, h, 1.0)
            })
            .sum();
        Ok(vec![0xCD; size])
    }
}
