//! Luban size classes: pick target dimensions and a byte budget from the
//! image's aspect ratio and long edge alone.

use std::borrow::Cow;

use log::{debug, info};

use super::clock::Stopwatch;
use super::compressor::Compressor;
use super::types::{CompressError, CompressionResult, Outcome};
use crate::codec::ImageCodec;
use crate::config::HeuristicPreset;
use crate::decode::DecodedImage;

/// What the heuristic decided for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeuristicPlan {
    /// The full-quality encoding is already small enough.
    Keep,
    /// Resize to `width`x`height`, then fit into `budget_kib` KiB.
    Resize {
        width: u32,
        height: u32,
        budget_kib: f64,
    },
}

impl HeuristicPlan {
    /// Byte budget for a `Resize` plan.
    pub fn budget_bytes(&self) -> Option<usize> {
        match self {
            HeuristicPlan::Keep => None,
            HeuristicPlan::Resize { budget_kib, .. } => Some(kib_to_bytes(*budget_kib)),
        }
    }
}

fn kib_to_bytes(kib: f64) -> usize {
    ((kib * 1024.0) as usize).max(1)
}

fn round_up_to_even(value: u32) -> u32 {
    value.saturating_add(value % 2)
}

/// Plan the Luban size class for a `width`x`height` image whose
/// full-quality encoding is `encoded_len` bytes.
///
/// The size class is picked from the edges rounded up to even. The target is
/// then divided down from the real edges; divisors never drop below 1, so a
/// plan never enlarges the image.
pub fn plan_heuristic(
    width: u32,
    height: u32,
    encoded_len: usize,
    preset: &HeuristicPreset,
) -> HeuristicPlan {
    let w = round_up_to_even(width.max(1)) as f64;
    let h = round_up_to_even(height.max(1)) as f64;
    let long = w.max(h);
    let short = w.min(h);
    let scale = short / long;
    let encoded_kib = (encoded_len / 1024) as f64;

    let (divisor, reference_area, budget_kib, floor_kib) = if scale > preset.square_ratio {
        if long < preset.small_edge {
            if encoded_kib < preset.small_keep_kib {
                return HeuristicPlan::Keep;
            }
            (
                1.0,
                preset.small_reference_edge.powi(2),
                preset.small_budget_kib,
                preset.small_floor_kib,
            )
        } else if long < preset.medium_edge {
            (
                2.0,
                preset.medium_reference_edge.powi(2),
                preset.medium_budget_kib,
                preset.medium_floor_kib,
            )
        } else if long < preset.large_edge {
            (
                4.0,
                preset.large_reference_edge.powi(2),
                preset.large_budget_kib,
                preset.large_floor_kib,
            )
        } else {
            (
                long / preset.target_edge,
                preset.large_reference_edge.powi(2),
                preset.large_budget_kib,
                preset.large_floor_kib,
            )
        }
    } else if scale > preset.wide_ratio {
        if h < preset.wide_keep_height && encoded_kib < preset.wide_keep_kib {
            return HeuristicPlan::Keep;
        }
        (
            long / preset.target_edge,
            preset.wide_reference_area,
            preset.wide_budget_kib,
            preset.wide_floor_kib,
        )
    } else {
        let reference_long = preset.target_edge / scale;
        (
            (long / reference_long).ceil(),
            preset.target_edge * reference_long,
            preset.panorama_budget_kib,
            preset.panorama_floor_kib,
        )
    };

    let divisor = divisor.max(1.0);
    let target_width = (width as f64 / divisor).round().clamp(1.0, width.max(1) as f64);
    let target_height = (height as f64 / divisor).round().clamp(1.0, height.max(1) as f64);
    let budget_kib = (target_width * target_height / reference_area * budget_kib).max(floor_kib);

    HeuristicPlan::Resize {
        width: target_width as u32,
        height: target_height as u32,
        budget_kib,
    }
}

impl<C: ImageCodec> Compressor<C> {
    /// Size `image` by the Luban heuristic: no caller budget, the target
    /// dimensions and budget come from its size class.
    ///
    /// # Errors
    ///
    /// `EncodeFailed` if the codec rejects the raster, `Cancelled` if the
    /// cancel flag is raised.
    pub fn compress_by_heuristic(
        &self,
        image: &DecodedImage,
    ) -> Result<CompressionResult, CompressError> {
        let watch = Stopwatch::start();
        self.check_cancelled()?;
        let full = self.codec.encode(image, 1.0)?;
        let plan = plan_heuristic(image.width, image.height, full.len(), &self.config.heuristic);
        debug!(
            "heuristic: {}x{} ({} bytes at quality 1.0) -> {:?}",
            image.width,
            image.height,
            full.len(),
            plan
        );

        let (width, height, budget_kib) = match plan {
            HeuristicPlan::Keep => {
                return Ok(CompressionResult {
                    bytes: full,
                    width: image.width,
                    height: image.height,
                    quality: 1.0,
                    elapsed: watch.elapsed(),
                    outcome: Outcome::Unchanged,
                });
            }
            HeuristicPlan::Resize {
                width,
                height,
                budget_kib,
            } => (width, height, budget_kib),
        };

        let target = if (width, height) == (image.width, image.height) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(self.codec.resize(image, width, height)?)
        };
        let (attempt, outcome) = self.fit_to_max_size(&target, kib_to_bytes(budget_kib))?;
        info!(
            "heuristic: {}x{} -> {}x{}, {} bytes (budget {:.1} KiB)",
            image.width,
            image.height,
            attempt.width,
            attempt.height,
            attempt.bytes.len(),
            budget_kib
        );
        Ok(attempt.into_result(outcome, watch.elapsed()))
    }

    /// Decode `bytes` (upright) and size them by the Luban heuristic.
    pub fn compress_bytes_by_heuristic(
        &self,
        bytes: &[u8],
    ) -> Result<CompressionResult, CompressError> {
        let image = self.codec.decode(bytes)?;
        self.compress_by_heuristic(&image)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Plans never upscale and never produce a zero edge or a budget
        /// under the smallest floor.
        #[test]
        fn prop_plan_bounded(
            width in 1u32..=30_000,
            height in 1u32..=30_000,
            encoded_len in 0usize..=20_000_000,
        ) {
            let preset = HeuristicPreset::default();
            if let HeuristicPlan::Resize { width: w, height: h, budget_kib } =
                plan_heuristic(width, height, encoded_len, &preset)
            {
                prop_assert!(w >= 1 && h >= 1);
                prop_assert!(w <= width && h <= height);
                prop_assert!(budget_kib >= preset.small_floor_kib);
            }
        }
    }
}
