//! Image encoding for the compressor.
//!
//! This module provides functionality for:
//! - Encoding RGB rasters to JPEG at an integer or fractional quality
//! - Encoding RGBA frame sequences to looping animated GIFs
//!
//! # Examples
//!
//! ```ignore
//! use luban_core::encode::encode_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 90).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod gif;
mod jpeg;

pub use gif::encode_gif;
pub use jpeg::{encode_jpeg, encode_jpeg_quality, quality_to_jpeg_scale, EncodeError};
