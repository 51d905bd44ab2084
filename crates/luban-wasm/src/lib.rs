//! Luban WASM - WebAssembly bindings for the Luban image compressor
//!
//! This crate provides WASM bindings to expose the luban-core compression
//! operations to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `compress` - Size-targeted, heuristic and animated compression bindings
//! - `logging` - Routes core log output to the browser console
//! - `types` - WASM-compatible wrapper for compression results
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_by_heuristic, init_logging } from '@luban/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//! init_logging('info');
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_by_heuristic(bytes);
//! console.log(`${result.width}x${result.height}, ${result.byte_length} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod logging;
mod types;

// Re-export public types
pub use compress::{compress_by_heuristic, compress_gif, compress_to_max_size, detect_format, JsCompressor};
pub use logging::init_logging;
pub use types::JsCompressionResult;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Warnings (exhausted budgets) are visible without any setup.
    logging::install(log::LevelFilter::Warn);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
