//! Tunable constants for the compressor.
//!
//! Every threshold the algorithms use lives here so it can be tuned or
//! loaded from a caller-provided document. The Luban coefficients are
//! empirical presets from photo-sharing apps, not correctness invariants.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;

/// Interval width below which the JPEG encoder cannot tell qualities apart.
pub const MIN_QUALITY_STEP: f32 = 0.01;

/// Upper bound accepted for `search_iterations`.
pub const MAX_SEARCH_ITERATIONS: u32 = 16;

/// Settings shared by all compression operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressionConfig {
    /// Maximum number of encodes in one quality binary search (1-16).
    pub search_iterations: u32,
    /// Quality at or below which the search gives up and downscales instead.
    pub quality_floor: f32,
    /// Smallest edge length the downscaling loops may produce.
    pub min_dimension: u32,
    /// Maximum resize-then-requantize rounds before giving up.
    pub max_downscale_rounds: u32,
    /// Longest display time a merged animation frame may receive.
    pub frame_duration_cap_ms: u64,
    /// Palette quantizer speed for GIF output (1 = best, 30 = fastest).
    pub gif_speed: i32,
    /// Resampling filter for all downscaling.
    pub filter: FilterType,
    /// Luban size-class preset.
    pub heuristic: HeuristicPreset,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            search_iterations: 8,
            quality_floor: 0.06,
            min_dimension: 1,
            max_downscale_rounds: 12,
            frame_duration_cap_ms: 200,
            gif_speed: 10,
            filter: FilterType::Lanczos3,
            heuristic: HeuristicPreset::default(),
        }
    }
}

impl CompressionConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every value is usable, returning a description of the first
    /// one that is not.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_SEARCH_ITERATIONS).contains(&self.search_iterations) {
            return Err(format!(
                "searchIterations must be in 1..={}, got {}",
                MAX_SEARCH_ITERATIONS, self.search_iterations
            ));
        }
        if !(0.0..1.0).contains(&self.quality_floor) {
            return Err(format!(
                "qualityFloor must be in [0, 1), got {}",
                self.quality_floor
            ));
        }
        if self.min_dimension == 0 {
            return Err("minDimension must be at least 1".to_string());
        }
        if self.max_downscale_rounds == 0 {
            return Err("maxDownscaleRounds must be at least 1".to_string());
        }
        if self.frame_duration_cap_ms == 0 {
            return Err("frameDurationCapMs must be at least 1".to_string());
        }
        self.heuristic.validate()
    }
}

/// Luban size classes. Budgets are in KiB of encoded output.
///
/// Images are first banded by `scale = short_edge / long_edge`:
/// near-square (`scale > square_ratio`), wide (`scale > wide_ratio`) and
/// panoramic (everything narrower). Near-square images are further banded
/// by long edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeuristicPreset {
    /// Aspect ratio above which an image counts as near-square (9:16).
    pub square_ratio: f64,
    /// Aspect ratio above which an image counts as wide (1:2).
    pub wide_ratio: f64,

    /// Long edge below which near-square images keep their size.
    pub small_edge: f64,
    /// Long edge below which near-square images are halved.
    pub medium_edge: f64,
    /// Long edge below which near-square images are quartered.
    pub large_edge: f64,
    /// Long edge that oversized and wide images are divided down toward.
    pub target_edge: f64,

    /// Small images under this encoded size are left alone.
    pub small_keep_kib: f64,
    pub small_reference_edge: f64,
    pub small_budget_kib: f64,
    pub small_floor_kib: f64,

    pub medium_reference_edge: f64,
    pub medium_budget_kib: f64,
    pub medium_floor_kib: f64,

    /// Shared by the quartered and the oversized near-square bands.
    pub large_reference_edge: f64,
    pub large_budget_kib: f64,
    pub large_floor_kib: f64,

    /// Wide images shorter than this and under `wide_keep_kib` are left alone.
    pub wide_keep_height: f64,
    pub wide_keep_kib: f64,
    /// Reference area (in pixels) for wide images.
    pub wide_reference_area: f64,
    pub wide_budget_kib: f64,
    pub wide_floor_kib: f64,

    pub panorama_budget_kib: f64,
    pub panorama_floor_kib: f64,
}

impl Default for HeuristicPreset {
    fn default() -> Self {
        Self {
            square_ratio: 0.5625,
            wide_ratio: 0.5,

            small_edge: 1664.0,
            medium_edge: 4990.0,
            large_edge: 10240.0,
            target_edge: 1280.0,

            small_keep_kib: 150.0,
            small_reference_edge: 1664.0,
            small_budget_kib: 150.0,
            small_floor_kib: 60.0,

            medium_reference_edge: 2495.0,
            medium_budget_kib: 300.0,
            medium_floor_kib: 60.0,

            large_reference_edge: 2560.0,
            large_budget_kib: 300.0,
            large_floor_kib: 100.0,

            wide_keep_height: 1280.0,
            wide_keep_kib: 200.0,
            wide_reference_area: 1440.0 * 2560.0,
            wide_budget_kib: 400.0,
            wide_floor_kib: 100.0,

            panorama_budget_kib: 500.0,
            panorama_floor_kib: 100.0,
        }
    }
}

impl HeuristicPreset {
    fn validate(&self) -> Result<(), String> {
        if !(self.wide_ratio > 0.0 && self.wide_ratio < self.square_ratio && self.square_ratio <= 1.0)
        {
            return Err(format!(
                "heuristic ratios must satisfy 0 < wideRatio < squareRatio <= 1, got {} and {}",
                self.wide_ratio, self.square_ratio
            ));
        }
        if !(self.small_edge < self.medium_edge && self.medium_edge < self.large_edge) {
            return Err("heuristic edges must increase: smallEdge < mediumEdge < largeEdge".into());
        }
        let positive = [
            self.target_edge,
            self.small_reference_edge,
            self.medium_reference_edge,
            self.large_reference_edge,
            self.wide_reference_area,
        ];
        if positive.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err("heuristic reference edges and areas must be positive".into());
        }
        Ok(())
    }
}
