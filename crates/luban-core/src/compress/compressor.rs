//! The compressor handle and constraint-based dispatch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use super::types::{
    AnimatedCompressionResult, CompressError, CompressionConstraint, CompressionResult, Outcome,
};
use crate::codec::{ImageCodec, JpegCodec};
use crate::config::CompressionConfig;
use crate::decode::{
    detect_format, resize_frames_to_fit, resize_to_fit, DecodeError, DecodedImage,
};

/// Compresses images toward a size constraint.
///
/// A compressor holds only immutable settings, so one instance can serve any
/// number of concurrent calls. Each call is independent; nothing is cached
/// between calls.
#[derive(Debug, Clone)]
pub struct Compressor<C = JpegCodec> {
    pub(super) codec: C,
    pub(super) config: CompressionConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl Compressor<JpegCodec> {
    /// Build a compressor over the default `image`-crate codec.
    ///
    /// # Errors
    ///
    /// Returns `CompressError::InvalidConfig` if `config.validate()` fails.
    pub fn new(config: CompressionConfig) -> Result<Self, CompressError> {
        let codec = JpegCodec::new(config.filter, config.gif_speed);
        Self::with_codec(codec, config)
    }
}

impl Default for Compressor<JpegCodec> {
    fn default() -> Self {
        let config = CompressionConfig::default();
        Self {
            codec: JpegCodec::new(config.filter, config.gif_speed),
            config,
            cancel: None,
        }
    }
}

impl<C: ImageCodec> Compressor<C> {
    /// Build a compressor over a caller-supplied codec.
    pub fn with_codec(codec: C, config: CompressionConfig) -> Result<Self, CompressError> {
        config.validate().map_err(CompressError::InvalidConfig)?;
        Ok(Self {
            codec,
            config,
            cancel: None,
        })
    }

    /// Attach a flag that, once set, stops any running call at its next
    /// encode attempt with `CompressError::Cancelled`.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub(super) fn check_cancelled(&self) -> Result<(), CompressError> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(CompressError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Compress encoded bytes of any supported container to satisfy `constraint`.
    ///
    /// Multi-frame GIFs go through the animated path and require a byte
    /// budget. Static images are decoded upright, fit inside `max_long_edge`
    /// when given, then either quality-searched toward `max_bytes` or, with
    /// no byte budget, sized by the Luban heuristic.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` for unknown containers or an animation without a
    /// byte budget, plus any decode/encode failure.
    pub fn compress(
        &self,
        bytes: &[u8],
        constraint: CompressionConstraint,
    ) -> Result<Compressed, CompressError> {
        let kind = detect_format(bytes).ok_or(CompressError::UnsupportedFormat)?;
        debug!("compress: {} input, {} bytes, {:?}", kind.mime_type(), bytes.len(), constraint);

        // A single-frame GIF is decoded once here and reused as the still.
        let mut first_frame = None;
        if kind.may_be_animated() {
            let mut frames = self.codec.decode_animation(bytes)?;
            if frames.len() > 1 {
                let max_bytes = constraint.max_bytes.ok_or(CompressError::UnsupportedFormat)?;
                // A resized sequence can no longer fall back to the source bytes.
                let (frames, source) = match constraint.max_long_edge {
                    Some(edge) => (resize_frames_to_fit(&frames, edge, self.codec.filter())?, None),
                    None => (frames, Some(bytes)),
                };
                info!("compress: animated input with {} frames", frames.len());
                return self
                    .animated_with_source(&frames, max_bytes, source)
                    .map(Compressed::Animated);
            }
            first_frame = frames
                .pop()
                .map(|frame| DecodedImage::from_rgba_image(frame.buffer));
        }

        let result = match (constraint.max_bytes, constraint.max_long_edge) {
            (Some(max_bytes), None) if bytes.len() <= max_bytes || first_frame.is_none() => {
                self.compress_bytes_to_max_size(bytes, max_bytes)?
            }
            (Some(max_bytes), None) => {
                let image = self.decode_still(bytes, first_frame)?;
                self.compress_to_max_size(&image, max_bytes)?
            }
            (Some(max_bytes), Some(edge)) => {
                let image = self.thumbnail_still(bytes, first_frame, edge)?;
                self.compress_to_max_size(&image, max_bytes)?
            }
            (None, Some(edge)) => {
                let image = self.thumbnail_still(bytes, first_frame, edge)?;
                self.compress_by_heuristic(&image)?
            }
            (None, None) => {
                let image = self.decode_still(bytes, first_frame)?;
                self.compress_by_heuristic(&image)?
            }
        };
        Ok(Compressed::Still(result))
    }

    fn decode_still(
        &self,
        bytes: &[u8],
        decoded: Option<DecodedImage>,
    ) -> Result<DecodedImage, DecodeError> {
        match decoded {
            Some(image) => Ok(image),
            None => self.codec.decode(bytes),
        }
    }

    fn thumbnail_still(
        &self,
        bytes: &[u8],
        decoded: Option<DecodedImage>,
        max_edge: u32,
    ) -> Result<DecodedImage, DecodeError> {
        match decoded {
            Some(image) => resize_to_fit(&image, max_edge, self.codec.filter()),
            None => self.codec.thumbnail(bytes, max_edge),
        }
    }
}

/// Output of [`Compressor::compress`], depending on the input container.
#[derive(Debug, Clone)]
pub enum Compressed {
    Still(CompressionResult),
    Animated(AnimatedCompressionResult),
}

impl Compressed {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Compressed::Still(result) => &result.bytes,
            Compressed::Animated(result) => &result.bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Compressed::Still(result) => result.bytes,
            Compressed::Animated(result) => result.bytes,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Compressed::Still(result) => result.outcome,
            Compressed::Animated(result) => result.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::AnimationFrame;
    use crate::encode::encode_gif;
    use crate::encode::EncodeError;
    use crate::test_support::noisy_jpeg;
    use std::cell::Cell;
    use std::io::Cursor;
    use std::time::Duration;

    /// Real codec that counts how often each decode entry point runs.
    #[derive(Default)]
    struct CountingCodec {
        inner: JpegCodec,
        decodes: Cell<usize>,
        animation_decodes: Cell<usize>,
    }

    impl ImageCodec for CountingCodec {
        fn encode(&self, image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
            self.inner.encode(image, quality)
        }

        fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
            self.decodes.set(self.decodes.get() + 1);
            self.inner.decode(bytes)
        }

        fn decode_animation(&self, bytes: &[u8]) -> Result<Vec<AnimationFrame>, DecodeError> {
            self.animation_decodes.set(self.animation_decodes.get() + 1);
            self.inner.decode_animation(bytes)
        }
    }

    fn single_frame_gif(width: u32, height: u32) -> Vec<u8> {
        let frame = AnimationFrame::new(
            image::RgbaImage::from_fn(width, height, |x, y| {
                image::Rgba([(x * 7) as u8, (y * 11) as u8, 90, 255])
            }),
            Duration::from_millis(100),
        );
        encode_gif(&[frame], 10).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = CompressionConfig::default();
        config.search_iterations = 0;
        assert!(matches!(
            Compressor::new(config),
            Err(CompressError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_cancel_flag_stops_call() {
        let flag = Arc::new(AtomicBool::new(true));
        let compressor = Compressor::default().with_cancel_flag(flag.clone());

        let result = compressor.compress(&noisy_jpeg(64, 64), CompressionConstraint::max_bytes(500));
        assert!(matches!(result, Err(CompressError::Cancelled)));

        flag.store(false, Ordering::Relaxed);
        assert!(compressor
            .compress(&noisy_jpeg(64, 64), CompressionConstraint::max_bytes(500))
            .is_ok());
    }

    #[test]
    fn test_compress_unknown_bytes() {
        let result = Compressor::default().compress(b"plain text", CompressionConstraint::default());
        assert!(matches!(result, Err(CompressError::UnsupportedFormat)));
    }

    #[test]
    fn test_compress_still_with_budget() {
        let jpeg = noisy_jpeg(96, 96);
        let compressed = Compressor::default()
            .compress(&jpeg, CompressionConstraint::max_bytes(jpeg.len() / 3))
            .unwrap();

        assert!(
            compressed.bytes().len() <= jpeg.len() / 3
                || compressed.outcome() == Outcome::ResolutionExhausted
        );
        assert!(matches!(compressed, Compressed::Still(_)));
    }

    #[test]
    fn test_compress_still_with_long_edge_only() {
        let jpeg = noisy_jpeg(120, 60);
        let compressed = Compressor::default()
            .compress(&jpeg, CompressionConstraint::max_long_edge(40))
            .unwrap();

        match compressed {
            Compressed::Still(result) => assert_eq!((result.width, result.height), (40, 20)),
            Compressed::Animated(_) => panic!("expected a still result"),
        }
    }

    #[test]
    fn test_compress_animation_requires_budget() {
        let frames: Vec<AnimationFrame> = (0..3)
            .map(|i| {
                AnimationFrame::new(
                    image::RgbaImage::from_pixel(8, 8, image::Rgba([i * 80, 0, 0, 255])),
                    Duration::from_millis(100),
                )
            })
            .collect();
        let gif = encode_gif(&frames, 10).unwrap();
        let compressor = Compressor::default();

        assert!(matches!(
            compressor.compress(&gif, CompressionConstraint::default()),
            Err(CompressError::UnsupportedFormat)
        ));

        let compressed = compressor
            .compress(&gif, CompressionConstraint::max_bytes(gif.len() + 1))
            .unwrap();
        assert_eq!(compressed.outcome(), Outcome::Unchanged);
        assert_eq!(compressed.into_bytes(), gif);
    }

    #[test]
    fn test_single_frame_gif_decoded_once() {
        let gif = single_frame_gif(48, 32);
        let compressor =
            Compressor::with_codec(CountingCodec::default(), CompressionConfig::default()).unwrap();

        let compressed = compressor
            .compress(&gif, CompressionConstraint::max_long_edge(24))
            .unwrap();
        match compressed {
            Compressed::Still(result) => assert_eq!((result.width, result.height), (24, 16)),
            Compressed::Animated(_) => panic!("expected a still result"),
        }

        let compressed = compressor
            .compress(&gif, CompressionConstraint::max_bytes(gif.len() / 2))
            .unwrap();
        assert!(matches!(compressed, Compressed::Still(_)));

        assert_eq!(compressor.codec().animation_decodes.get(), 2);
        assert_eq!(compressor.codec().decodes.get(), 0);
    }

    #[test]
    fn test_single_frame_gif_within_budget_passes_through() {
        let gif = single_frame_gif(16, 16);
        let compressed = Compressor::default()
            .compress(&gif, CompressionConstraint::max_bytes(gif.len()))
            .unwrap();

        assert_eq!(compressed.outcome(), Outcome::Unchanged);
        assert_eq!(compressed.into_bytes(), gif);
    }

    #[test]
    fn test_compress_tiff_input() {
        let mut tiff = Vec::new();
        image::DynamicImage::ImageRgb8(image::RgbImage::from_fn(40, 30, |x, y| {
            image::Rgb([(x * 5) as u8, (y * 7) as u8, ((x + y) * 3) as u8])
        }))
        .write_to(&mut Cursor::new(&mut tiff), image::ImageFormat::Tiff)
        .unwrap();
        assert_eq!(detect_format(&tiff), Some(crate::decode::ImageKind::Tiff));

        let compressed = Compressor::default()
            .compress(&tiff, CompressionConstraint::max_bytes(tiff.len() / 2))
            .unwrap();
        match compressed {
            Compressed::Still(result) => {
                assert_eq!((result.width, result.height), (40, 30));
                assert_eq!(detect_format(&result.bytes), Some(crate::decode::ImageKind::Jpeg));
                assert!(result.len() <= tiff.len() / 2);
            }
            Compressed::Animated(_) => panic!("expected a still result"),
        }
    }
}
