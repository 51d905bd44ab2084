//! Animated GIF reduction: drop frames first, then shrink the canvas.

use std::time::Duration;

use log::{debug, info, warn};

use super::clock::Stopwatch;
use super::compressor::Compressor;
use super::types::{AnimatedCompressionResult, CompressError, Outcome};
use crate::codec::ImageCodec;
use crate::decode::{detect_format, resize_frames_to_fit, AnimationFrame, ImageKind};

/// Every kept frame stands for this many source frames.
///
/// | frames  | sample count |
/// |---------|--------------|
/// | < 2     | 1            |
/// | 2..8    | 2            |
/// | 8..20   | 3            |
/// | 20..30  | 4            |
/// | 30..40  | 5            |
/// | >= 40   | 6            |
pub fn fit_sample_count(frame_count: usize) -> usize {
    match frame_count {
        0..=1 => 1,
        2..=7 => 2,
        8..=19 => 3,
        20..=29 => 4,
        30..=39 => 5,
        _ => 6,
    }
}

/// Keep every `sample_count`-th frame. Each kept frame takes the summed
/// duration of the frames it replaces, capped at `cap`.
pub fn subsample_frames(
    frames: &[AnimationFrame],
    sample_count: usize,
    cap: Duration,
) -> Vec<AnimationFrame> {
    frames
        .chunks(sample_count.max(1))
        .filter_map(|group| {
            let (first, _) = group.split_first()?;
            let total: Duration = group.iter().map(|frame| frame.duration).sum();
            Some(AnimationFrame::new(first.buffer.clone(), total.min(cap)))
        })
        .collect()
}

fn long_edge(frames: &[AnimationFrame]) -> u32 {
    frames
        .first()
        .map(|frame| {
            let (width, height) = frame.dimensions();
            width.max(height)
        })
        .unwrap_or(0)
}

/// Smallest animation encoded so far.
struct Encoded {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl Encoded {
    fn new(bytes: Vec<u8>, frames: &[AnimationFrame]) -> Self {
        let (width, height) = frames.first().map_or((0, 0), AnimationFrame::dimensions);
        Self {
            bytes,
            width,
            height,
        }
    }
}

impl<C: ImageCodec> Compressor<C> {
    /// Reduce an animation to at most `max_bytes`.
    ///
    /// The sequence is first encoded as-is. If that is too large, frames are
    /// subsampled by [`fit_sample_count`] with merged durations, then the
    /// sampled frames are scaled down by `sqrt(max_bytes / size)` per round
    /// until the output fits, the minimum dimension is reached, or the round
    /// cap runs out (`Outcome::ResolutionExhausted`).
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` for an empty sequence, `InvalidBudget` for a zero
    /// budget, `EncodeFailed` if frames differ in size.
    pub fn compress_animated_sequence(
        &self,
        frames: &[AnimationFrame],
        max_bytes: usize,
    ) -> Result<AnimatedCompressionResult, CompressError> {
        self.animated_with_source(frames, max_bytes, None)
    }

    /// Byte-level variant of
    /// [`compress_animated_sequence`](Self::compress_animated_sequence).
    /// Input within budget is returned verbatim.
    pub fn compress_gif_bytes(
        &self,
        bytes: &[u8],
        max_bytes: usize,
    ) -> Result<AnimatedCompressionResult, CompressError> {
        if max_bytes == 0 {
            return Err(CompressError::InvalidBudget);
        }
        if detect_format(bytes) != Some(ImageKind::Gif) {
            return Err(CompressError::UnsupportedFormat);
        }
        let frames = self.codec.decode_animation(bytes)?;
        self.animated_with_source(&frames, max_bytes, Some(bytes))
    }

    /// Shared body of the animated entry points. `source` is the encoded
    /// form of `frames`, when the caller has one.
    pub(super) fn animated_with_source(
        &self,
        frames: &[AnimationFrame],
        max_bytes: usize,
        source: Option<&[u8]>,
    ) -> Result<AnimatedCompressionResult, CompressError> {
        if frames.is_empty() {
            return Err(CompressError::UnsupportedFormat);
        }
        if max_bytes == 0 {
            return Err(CompressError::InvalidBudget);
        }
        let watch = Stopwatch::start();
        let original_durations: Vec<Duration> = frames.iter().map(|f| f.duration).collect();

        let result = |encoded: Encoded, durations, sample_count, outcome| {
            AnimatedCompressionResult {
                bytes: encoded.bytes,
                width: encoded.width,
                height: encoded.height,
                frame_durations: durations,
                sample_count,
                elapsed: watch.elapsed(),
                outcome,
            }
        };

        match source {
            Some(bytes) if bytes.len() <= max_bytes => {
                debug!("animation: {} bytes already within budget", bytes.len());
                let encoded = Encoded::new(bytes.to_vec(), frames);
                return Ok(result(encoded, original_durations, 1, Outcome::Unchanged));
            }
            Some(_) => {}
            None => {
                self.check_cancelled()?;
                let data = self.codec.encode_animation(frames)?;
                debug!("animation: {} frames as-is -> {} bytes", frames.len(), data.len());
                if data.len() <= max_bytes {
                    let encoded = Encoded::new(data, frames);
                    return Ok(result(encoded, original_durations, 1, Outcome::WithinBudget));
                }
            }
        }

        let sample_count = fit_sample_count(frames.len());
        let cap = Duration::from_millis(self.config.frame_duration_cap_ms);
        let sampled = subsample_frames(frames, sample_count, cap);
        let durations: Vec<Duration> = sampled.iter().map(|f| f.duration).collect();
        debug!(
            "animation: keeping every {} of {} frames -> {}",
            sample_count,
            frames.len(),
            sampled.len()
        );

        self.check_cancelled()?;
        let mut current_edge = long_edge(&sampled);
        let mut latest = Encoded::new(self.codec.encode_animation(&sampled)?, &sampled);
        let mut smallest: Option<Encoded> = None;
        let mut round = 0;

        loop {
            if latest.bytes.len() <= max_bytes {
                info!(
                    "animation: {}x{}, {} frames -> {} bytes after {} downscale rounds",
                    latest.width,
                    latest.height,
                    sampled.len(),
                    latest.bytes.len(),
                    round
                );
                return Ok(result(latest, durations, sample_count, Outcome::WithinBudget));
            }

            let ratio = (max_bytes as f64 / latest.bytes.len() as f64).sqrt();
            let best = match smallest.take() {
                Some(previous) if previous.bytes.len() <= latest.bytes.len() => previous,
                _ => latest,
            };

            let next_edge = ((current_edge as f64 * ratio.min(0.9)).floor() as u32)
                .max(self.config.min_dimension);
            if round >= self.config.max_downscale_rounds || next_edge >= current_edge {
                warn!(
                    "animation: resolution exhausted at {}x{}, best effort {} bytes exceeds {} byte budget",
                    best.width,
                    best.height,
                    best.bytes.len(),
                    max_bytes
                );
                return Ok(result(best, durations, sample_count, Outcome::ResolutionExhausted));
            }
            smallest = Some(best);

            debug!("animation: round {}: long edge {} -> {}", round, current_edge, next_edge);
            let resized = resize_frames_to_fit(&sampled, next_edge, self.codec.filter())?;
            self.check_cancelled()?;
            latest = Encoded::new(self.codec.encode_animation(&resized)?, &resized);
            current_edge = next_edge;
            round += 1;
        }
    }
}
