//! Animated GIF encoding.

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use super::EncodeError;
use crate::decode::AnimationFrame;

/// Encode frames into a looping animated GIF.
///
/// `speed` is the palette quantizer speed (1 = best palette, 30 = fastest);
/// values outside that range are clamped.
///
/// # Errors
///
/// Returns `EncodeError::NoFrames` for an empty slice and
/// `EncodeError::FrameSizeMismatch` if frames differ in size.
pub fn encode_gif(frames: &[AnimationFrame], speed: i32) -> Result<Vec<u8>, EncodeError> {
    let first = frames.first().ok_or(EncodeError::NoFrames)?;
    let expected = first.dimensions();

    if expected.0 == 0 || expected.1 == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: expected.0,
            height: expected.1,
        });
    }

    if let Some((index, frame)) = frames
        .iter()
        .enumerate()
        .find(|(_, frame)| frame.dimensions() != expected)
    {
        return Err(EncodeError::FrameSizeMismatch {
            index,
            expected,
            actual: frame.dimensions(),
        });
    }

    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, speed.clamp(1, 30));
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

        let gif_frames = frames.iter().map(|frame| {
            Frame::from_parts(
                frame.buffer.clone(),
                0,
                0,
                Delay::from_saturating_duration(frame.duration),
            )
        });

        encoder
            .encode_frames(gif_frames)
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn frame(width: u32, height: u32, value: u8) -> AnimationFrame {
        AnimationFrame::new(
            image::RgbaImage::from_pixel(width, height, image::Rgba([value, value, 0, 255])),
            Duration::from_millis(100),
        )
    }

    #[test]
    fn test_encode_gif_header() {
        let gif = encode_gif(&[frame(4, 4, 0), frame(4, 4, 200)], 10).unwrap();
        assert_eq!(&gif[0..6], b"GIF89a");
        assert_eq!(gif.last(), Some(&0x3B));
    }

    #[test]
    fn test_encode_gif_empty() {
        assert!(matches!(encode_gif(&[], 10), Err(EncodeError::NoFrames)));
    }

    #[test]
    fn test_encode_gif_size_mismatch() {
        let result = encode_gif(&[frame(4, 4, 0), frame(4, 4, 1), frame(5, 4, 2)], 10);
        assert!(matches!(
            result,
            Err(EncodeError::FrameSizeMismatch {
                index: 2,
                expected: (4, 4),
                actual: (5, 4)
            })
        ));
    }

    #[test]
    fn test_encode_gif_zero_canvas() {
        let result = encode_gif(&[frame(0, 3, 0)], 10);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_gif_speed_clamped() {
        assert!(encode_gif(&[frame(3, 3, 9)], 0).is_ok());
        assert!(encode_gif(&[frame(3, 3, 9)], 500).is_ok());
    }
}
