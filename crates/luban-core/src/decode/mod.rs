//! Image decoding for the compressor.
//!
//! This module provides functionality for:
//! - Sniffing the container format of caller-supplied bytes
//! - Decoding static images to RGB8 with EXIF orientation applied
//! - Decoding every frame of an animated GIF
//! - Resizing rasters and animation frames for the downscaling stages
//!
//! # Examples
//!
//! ```ignore
//! use luban_core::decode::{decode_image, detect_format};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! println!("{:?}", detect_format(&bytes));
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod animation;
mod format;
mod raster;
mod resize;
mod types;

pub use animation::{decode_gif_frames, DEFAULT_FRAME_DELAY};
pub use format::{detect_format, image_dimensions};
pub use raster::{decode_image, decode_image_no_orientation, get_orientation};
pub use resize::{resize, resize_frames_to_fit, resize_to_fit, scale_dimensions};
pub use types::{AnimationFrame, DecodeError, DecodedImage, FilterType, ImageKind, Orientation};
