//! Quality search with bounded downscaling toward a byte ceiling.

use std::borrow::Cow;
use std::time::Duration;

use log::{debug, info, warn};

use super::clock::Stopwatch;
use super::compressor::Compressor;
use super::search::QualitySearch;
use super::types::{CompressError, CompressionResult, Outcome};
use crate::codec::ImageCodec;
use crate::decode::{image_dimensions, scale_dimensions, DecodedImage};

/// Every downscale round shrinks each edge by at least this factor.
const MAX_SHRINK_RATIO: f64 = 0.9;

/// One encoded candidate and the raster it came from.
pub(super) struct Attempt {
    pub(super) bytes: Vec<u8>,
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) quality: f32,
}

impl Attempt {
    fn new(bytes: Vec<u8>, image: &DecodedImage, quality: f32) -> Self {
        Self {
            bytes,
            width: image.width,
            height: image.height,
            quality,
        }
    }

    pub(super) fn into_result(self, outcome: Outcome, elapsed: Duration) -> CompressionResult {
        CompressionResult {
            bytes: self.bytes,
            width: self.width,
            height: self.height,
            quality: self.quality,
            elapsed,
            outcome,
        }
    }
}

impl<C: ImageCodec> Compressor<C> {
    /// Encode `image` at or below `max_bytes`.
    ///
    /// Tries full quality first, then binary-searches the quality factor,
    /// then shrinks the raster by `sqrt(max_bytes / smallest_size)` and
    /// repeats. If the minimum dimension or the round cap is reached first,
    /// the smallest encoding seen is returned with
    /// `Outcome::ResolutionExhausted`.
    ///
    /// # Errors
    ///
    /// `InvalidBudget` for a zero budget, `EncodeFailed` if the codec rejects
    /// the raster, `Cancelled` if the cancel flag is raised.
    pub fn compress_to_max_size(
        &self,
        image: &DecodedImage,
        max_bytes: usize,
    ) -> Result<CompressionResult, CompressError> {
        let watch = Stopwatch::start();
        let (attempt, outcome) = self.fit_to_max_size(image, max_bytes)?;
        Ok(attempt.into_result(outcome, watch.elapsed()))
    }

    /// Byte-level variant of [`compress_to_max_size`](Self::compress_to_max_size).
    ///
    /// Input already within budget is returned verbatim, so compressing an
    /// already-compressed file again with the same budget changes nothing.
    pub fn compress_bytes_to_max_size(
        &self,
        bytes: &[u8],
        max_bytes: usize,
    ) -> Result<CompressionResult, CompressError> {
        if max_bytes == 0 {
            return Err(CompressError::InvalidBudget);
        }
        let watch = Stopwatch::start();

        if bytes.len() <= max_bytes {
            let (width, height) = image_dimensions(bytes)?;
            debug!("{} bytes already within {} byte budget", bytes.len(), max_bytes);
            return Ok(CompressionResult {
                bytes: bytes.to_vec(),
                width,
                height,
                quality: 1.0,
                elapsed: watch.elapsed(),
                outcome: Outcome::Unchanged,
            });
        }

        let image = self.codec.decode(bytes)?;
        let (attempt, outcome) = self.fit_to_max_size(&image, max_bytes)?;
        Ok(attempt.into_result(outcome, watch.elapsed()))
    }

    pub(super) fn fit_to_max_size(
        &self,
        source: &DecodedImage,
        max_bytes: usize,
    ) -> Result<(Attempt, Outcome), CompressError> {
        if max_bytes == 0 {
            return Err(CompressError::InvalidBudget);
        }

        let mut current = Cow::Borrowed(source);
        let mut smallest: Option<Attempt> = None;
        let mut round = 0;

        loop {
            self.check_cancelled()?;
            let full = self.codec.encode(&current, 1.0)?;
            debug!(
                "round {}: {}x{} at quality 1.0 -> {} bytes",
                round,
                current.width,
                current.height,
                full.len()
            );
            if full.len() <= max_bytes {
                return Ok((Attempt::new(full, &current, 1.0), Outcome::WithinBudget));
            }

            let mut search =
                QualitySearch::new(self.config.search_iterations, self.config.quality_floor);
            let mut fitting: Option<Attempt> = None;
            let mut lowest = Attempt::new(full, &current, 1.0);

            while let Some(quality) = search.next_quality() {
                self.check_cancelled()?;
                let data = self.codec.encode(&current, quality)?;
                let fits = data.len() <= max_bytes;
                debug!(
                    "round {}: quality {:.4} -> {} bytes (budget {})",
                    round,
                    quality,
                    data.len(),
                    max_bytes
                );
                search.record(quality, fits);

                if fits {
                    fitting = Some(Attempt::new(data, &current, quality));
                } else if data.len() < lowest.bytes.len() {
                    lowest = Attempt::new(data, &current, quality);
                }
            }

            if let Some(attempt) = fitting {
                info!(
                    "fit {}x{} into {} bytes at quality {:.4} after {} downscale rounds",
                    attempt.width,
                    attempt.height,
                    attempt.bytes.len(),
                    attempt.quality,
                    round
                );
                return Ok((attempt, Outcome::WithinBudget));
            }

            let ratio = (max_bytes as f64 / lowest.bytes.len() as f64).sqrt();
            let best = match smallest.take() {
                Some(previous) if previous.bytes.len() <= lowest.bytes.len() => previous,
                _ => lowest,
            };

            let next = if round < self.config.max_downscale_rounds {
                next_dimensions(current.width, current.height, ratio, self.config.min_dimension)
            } else {
                None
            };

            match next {
                Some((width, height)) => {
                    debug!(
                        "round {}: quality floor reached, downscaling {}x{} -> {}x{}",
                        round, current.width, current.height, width, height
                    );
                    current = Cow::Owned(self.codec.resize(source, width, height)?);
                    smallest = Some(best);
                    round += 1;
                }
                None => {
                    warn!(
                        "resolution exhausted at {}x{}: best effort {} bytes exceeds {} byte budget",
                        best.width,
                        best.height,
                        best.bytes.len(),
                        max_bytes
                    );
                    return Ok((best, Outcome::ResolutionExhausted));
                }
            }
        }
    }
}

/// Dimensions for the next downscale round, or `None` when neither edge can
/// shrink without going below `min_dimension`.
///
/// The ratio is capped at [`MAX_SHRINK_RATIO`] so every round makes progress,
/// and the result never grows past the current size.
pub(super) fn next_dimensions(
    width: u32,
    height: u32,
    ratio: f64,
    min_dimension: u32,
) -> Option<(u32, u32)> {
    let (scaled_width, scaled_height) = scale_dimensions(width, height, ratio.min(MAX_SHRINK_RATIO));
    let min = min_dimension.max(1);
    let next = (
        scaled_width.max(min).min(width),
        scaled_height.max(min).min(height),
    );
    (next != (width, height)).then_some(next)
}
