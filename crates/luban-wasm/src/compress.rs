//! Compression WASM bindings.
//!
//! This module exposes the luban-core compressor to JavaScript. The free
//! functions use the default settings; [`JsCompressor`] takes a config object
//! and can be cancelled.
//!
//! # Example
//!
//! ```typescript
//! import { compress_to_max_size, compress_gif, JsCompressor } from '@luban/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_to_max_size(bytes, 200 * 1024);
//! console.log(`${result.width}x${result.height} at q=${result.quality}: ${result.outcome}`);
//!
//! const compressor = new JsCompressor({ searchIterations: 6, minDimension: 64 });
//! const out = compressor.compress(bytes, { maxBytes: 100_000, maxLongEdge: 1920 });
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::types::JsCompressionResult;
use luban_core::decode;
use luban_core::{CompressionConfig, CompressionConstraint, Compressor};
use wasm_bindgen::prelude::*;

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Compress encoded image bytes to at most `max_bytes`.
///
/// Input already within budget is returned unchanged. Otherwise the JPEG
/// quality is binary-searched, and the image is downscaled when even the
/// lowest quality is too large.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded or `max_bytes` is zero.
#[wasm_bindgen]
pub fn compress_to_max_size(bytes: &[u8], max_bytes: usize) -> Result<JsCompressionResult, JsValue> {
    Compressor::default()
        .compress_bytes_to_max_size(bytes, max_bytes)
        .map(JsCompressionResult::from)
        .map_err(to_js_error)
}

/// Compress encoded image bytes with the Luban size classes, where the
/// dimensions and budget are derived from the image itself.
#[wasm_bindgen]
pub fn compress_by_heuristic(bytes: &[u8]) -> Result<JsCompressionResult, JsValue> {
    Compressor::default()
        .compress_bytes_by_heuristic(bytes)
        .map(JsCompressionResult::from)
        .map_err(to_js_error)
}

/// Reduce an animated GIF to at most `max_bytes` by dropping frames and then
/// shrinking the canvas.
#[wasm_bindgen]
pub fn compress_gif(bytes: &[u8], max_bytes: usize) -> Result<JsCompressionResult, JsValue> {
    Compressor::default()
        .compress_gif_bytes(bytes, max_bytes)
        .map(JsCompressionResult::from)
        .map_err(to_js_error)
}

/// MIME type sniffed from the leading bytes, or `undefined` if unknown.
#[wasm_bindgen]
pub fn detect_format(bytes: &[u8]) -> Option<String> {
    decode::detect_format(bytes).map(|kind| kind.mime_type().to_string())
}

/// A configured compressor.
///
/// Config and constraint objects use camelCase keys; missing keys take their
/// defaults.
#[wasm_bindgen]
pub struct JsCompressor {
    inner: Compressor,
    cancel: Arc<AtomicBool>,
}

#[wasm_bindgen]
impl JsCompressor {
    /// Create a compressor from a config object, or the defaults when
    /// `config` is `undefined` or `null`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCompressor, JsValue> {
        let config: CompressionConfig = if config.is_undefined() || config.is_null() {
            CompressionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
        };
        Self::from_config(config).map_err(to_js_error)
    }

    /// Compress bytes against a `{ maxBytes?, maxLongEdge? }` constraint.
    ///
    /// Animated GIFs need `maxBytes`. With neither key set the Luban size
    /// classes decide.
    pub fn compress(&self, bytes: &[u8], constraint: JsValue) -> Result<JsCompressionResult, JsValue> {
        let constraint: CompressionConstraint = if constraint.is_undefined() || constraint.is_null() {
            CompressionConstraint::default()
        } else {
            serde_wasm_bindgen::from_value(constraint).map_err(to_js_error)?
        };
        self.inner
            .compress(bytes, constraint)
            .map(JsCompressionResult::from)
            .map_err(to_js_error)
    }

    pub fn compress_to_max_size(&self, bytes: &[u8], max_bytes: usize) -> Result<JsCompressionResult, JsValue> {
        self.inner
            .compress_bytes_to_max_size(bytes, max_bytes)
            .map(JsCompressionResult::from)
            .map_err(to_js_error)
    }

    pub fn compress_by_heuristic(&self, bytes: &[u8]) -> Result<JsCompressionResult, JsValue> {
        self.inner
            .compress_bytes_by_heuristic(bytes)
            .map(JsCompressionResult::from)
            .map_err(to_js_error)
    }

    pub fn compress_gif(&self, bytes: &[u8], max_bytes: usize) -> Result<JsCompressionResult, JsValue> {
        self.inner
            .compress_gif_bytes(bytes, max_bytes)
            .map(JsCompressionResult::from)
            .map_err(to_js_error)
    }

    /// Raise the cancel flag. Every later call fails with "Compression
    /// cancelled" until `reset()` is called.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Clear a previous `cancel()`.
    pub fn reset(&self) {
        self.cancel.store(false, Ordering::Relaxed);
    }

    /// The active configuration as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(to_js_error)
    }
}

impl JsCompressor {
    pub(crate) fn from_config(
        config: CompressionConfig,
    ) -> Result<Self, luban_core::CompressError> {
        let cancel = Arc::new(AtomicBool::new(false));
        let inner = Compressor::new(config)?.with_cancel_flag(cancel.clone());
        Ok(Self { inner, cancel })
    }
}
