//! Multi-frame GIF decoding.

use std::io::Cursor;
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use log::debug;

use super::{AnimationFrame, DecodeError};

/// Delays shorter than this are treated as unset by browsers.
const MIN_FRAME_DELAY: Duration = Duration::from_millis(11);

/// Substitute used for unset or too-short frame delays.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Decode every frame of a GIF into full-canvas RGBA frames.
///
/// Frame delays below 11 ms are replaced with 100 ms, matching how browsers
/// play such files.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the GIF stream is invalid and
/// `DecodeError::NoFrames` if it decodes to nothing.
pub fn decode_gif_frames(bytes: &[u8]) -> Result<Vec<AnimationFrame>, DecodeError> {
    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if frames.is_empty() {
        return Err(DecodeError::NoFrames);
    }

    Ok(frames
        .into_iter()
        .map(|frame| {
            let duration = normalize_delay(Duration::from(frame.delay()));
            AnimationFrame::new(frame.into_buffer(), duration)
        })
        .collect())
}

fn normalize_delay(delay: Duration) -> Duration {
    if delay < MIN_FRAME_DELAY {
        debug!("frame delay {:?} below minimum, using {:?}", delay, DEFAULT_FRAME_DELAY);
        DEFAULT_FRAME_DELAY
    } else {
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_gif;

    fn frames(count: usize, delay_ms: u64) -> Vec<AnimationFrame> {
        (0..count)
            .map(|i| {
                let shade = (i * 40 % 256) as u8;
                AnimationFrame::new(
                    image::RgbaImage::from_pixel(6, 4, image::Rgba([shade, 0, 255 - shade, 255])),
                    Duration::from_millis(delay_ms),
                )
            })
            .collect()
    }

    #[test]
    fn test_decode_gif_frames_preserves_count_and_delay() {
        let gif = encode_gif(&frames(3, 120), 10).unwrap();
        let decoded = decode_gif_frames(&gif).unwrap();

        assert_eq!(decoded.len(), 3);
        for frame in &decoded {
            assert_eq!(frame.dimensions(), (6, 4));
            assert_eq!(frame.duration, Duration::from_millis(120));
        }
    }

    #[test]
    fn test_decode_gif_zero_delay_defaults() {
        let gif = encode_gif(&frames(2, 0), 10).unwrap();
        let decoded = decode_gif_frames(&gif).unwrap();

        assert!(decoded.iter().all(|f| f.duration == DEFAULT_FRAME_DELAY));
    }

    #[test]
    fn test_decode_gif_invalid_bytes() {
        assert!(matches!(
            decode_gif_frames(b"definitely not a gif"),
            Err(DecodeError::CorruptedFile(_))
        ));
    }

    #[test]
    fn test_normalize_delay() {
        assert_eq!(normalize_delay(Duration::from_millis(10)), DEFAULT_FRAME_DELAY);
        assert_eq!(normalize_delay(Duration::from_millis(11)), Duration::from_millis(11));
        assert_eq!(normalize_delay(Duration::from_millis(500)), Duration::from_millis(500));
    }
}
