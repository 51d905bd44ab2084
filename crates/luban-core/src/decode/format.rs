//! Container sniffing and header-only probes.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use super::{DecodeError, ImageKind};

/// Identify the container from its leading magic bytes.
///
/// Returns `None` for anything that is not JPEG, PNG, GIF, TIFF or WebP.
pub fn detect_format(bytes: &[u8]) -> Option<ImageKind> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Jpeg => Some(ImageKind::Jpeg),
        ImageFormat::Png => Some(ImageKind::Png),
        ImageFormat::Gif => Some(ImageKind::Gif),
        ImageFormat::Tiff => Some(ImageKind::Tiff),
        ImageFormat::WebP => Some(ImageKind::WebP),
        _ => None,
    }
}

/// Read pixel dimensions from the header without decoding pixel data.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}
