//! Image resizing used by the downscaling stages.
//!
//! All functions return new images without modifying the input.

use super::{AnimationFrame, DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for a zero target dimension and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// stated dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Resize an image to fit within a maximum edge length while preserving aspect ratio.
///
/// Images that already fit are returned unchanged; nothing is upscaled.
pub fn resize_to_fit(
    image: &DecodedImage,
    max_edge: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(image.clone());
    }

    let (new_width, new_height) = fit_dimensions(image.width, image.height, max_edge);

    resize(image, new_width, new_height, filter)
}

/// Resize every frame of an animation to fit within `max_edge`.
///
/// Durations are carried over untouched.
pub fn resize_frames_to_fit(
    frames: &[AnimationFrame],
    max_edge: u32,
    filter: FilterType,
) -> Result<Vec<AnimationFrame>, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    Ok(frames
        .iter()
        .map(|frame| {
            let (width, height) = frame.dimensions();
            if width <= max_edge && height <= max_edge {
                return frame.clone();
            }
            let (new_width, new_height) = fit_dimensions(width, height, max_edge);
            let buffer = image::imageops::resize(
                &frame.buffer,
                new_width,
                new_height,
                filter.to_image_filter(),
            );
            AnimationFrame::new(buffer, frame.duration)
        })
        .collect())
}

/// Scale both edges by `ratio`, flooring and never going below one pixel.
pub fn scale_dimensions(width: u32, height: u32, ratio: f64) -> (u32, u32) {
    let ratio = if ratio.is_finite() { ratio.max(0.0) } else { 1.0 };
    let scale = |edge: u32| ((edge as f64 * ratio).floor() as u32).max(1);
    (scale(width), scale(height))
}

/// Calculate dimensions to fit within max_edge while preserving aspect ratio.
fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}
