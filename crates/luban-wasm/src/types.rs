//! WASM-compatible wrapper types for compression results.
//!
//! This module provides a JavaScript-friendly view of the core result types,
//! handling the conversion between Rust and JavaScript data representations.

use luban_core::{AnimatedCompressionResult, Compressed, CompressionResult, Outcome};
use wasm_bindgen::prelude::*;

/// The result of any compression call, still or animated.
///
/// # Memory Management
///
/// The encoded bytes are stored in WASM memory. Calling `bytes()` copies them
/// into a JavaScript `Uint8Array`; wasm-bindgen's generated `free()` releases
/// the WASM copy early.
#[wasm_bindgen]
pub struct JsCompressionResult {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    quality: f32,
    outcome: Outcome,
    elapsed_ms: f64,
    frame_durations_ms: Vec<f64>,
    sample_count: usize,
    animated: bool,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// Output width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Quality factor of the final JPEG encode, in (0, 1]. Always 1 for
    /// animations.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// `"withinBudget"`, `"unchanged"` or `"resolutionExhausted"`.
    #[wasm_bindgen(getter)]
    pub fn outcome(&self) -> String {
        outcome_name(self.outcome).to_string()
    }

    /// Whether the output meets the requested byte budget.
    #[wasm_bindgen(getter)]
    pub fn within_budget(&self) -> bool {
        self.outcome.is_within_budget()
    }

    /// Wall-clock time the call took, in milliseconds.
    #[wasm_bindgen(getter)]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Whether the output is an animated GIF.
    #[wasm_bindgen(getter)]
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Every `sample_count`-th source frame was kept. 1 for stills.
    #[wasm_bindgen(getter)]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Per-frame display times in milliseconds. Empty for stills.
    pub fn frame_durations_ms(&self) -> Vec<f64> {
        self.frame_durations_ms.clone()
    }

    /// Number of encoded bytes
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the encoded image as a Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl From<CompressionResult> for JsCompressionResult {
    fn from(result: CompressionResult) -> Self {
        Self {
            bytes: result.bytes,
            width: result.width,
            height: result.height,
            quality: result.quality,
            outcome: result.outcome,
            elapsed_ms: result.elapsed.as_secs_f64() * 1000.0,
            frame_durations_ms: Vec::new(),
            sample_count: 1,
            animated: false,
        }
    }
}

impl From<AnimatedCompressionResult> for JsCompressionResult {
    fn from(result: AnimatedCompressionResult) -> Self {
        Self {
            frame_durations_ms: result
                .frame_durations
                .iter()
                .map(|d| d.as_secs_f64() * 1000.0)
                .collect(),
            bytes: result.bytes,
            width: result.width,
            height: result.height,
            quality: 1.0,
            outcome: result.outcome,
            elapsed_ms: result.elapsed.as_secs_f64() * 1000.0,
            sample_count: result.sample_count,
            animated: true,
        }
    }
}

impl From<Compressed> for JsCompressionResult {
    fn from(compressed: Compressed) -> Self {
        match compressed {
            Compressed::Still(result) => result.into(),
            Compressed::Animated(result) => result.into(),
        }
    }
}

/// Name of an outcome as exposed to JavaScript.
pub(crate) fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::WithinBudget => "withinBudget",
        Outcome::Unchanged => "unchanged",
        Outcome::ResolutionExhausted => "resolutionExhausted",
    }
}
