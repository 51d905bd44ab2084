//! Size-constrained compression.
//!
//! Three strategies share one bounded search engine:
//!
//! - [`compress_to_max_size`]: binary-search the JPEG quality toward a byte
//!   budget, downscaling by the square root of the overshoot when the
//!   quality floor is reached.
//! - [`compress_by_heuristic`]: Luban size classes pick the dimensions and
//!   the budget from the image's aspect ratio and long edge.
//! - [`compress_animated_sequence`]: subsample GIF frames with merged
//!   durations, then shrink the canvas until the budget is met.
//!
//! The free functions use a default [`Compressor`]; build one explicitly to
//! change the configuration, the codec, or to attach a cancel flag.

mod animated;
mod clock;
mod compressor;
mod heuristic;
mod max_size;
mod search;
mod types;

pub use animated::{fit_sample_count, subsample_frames};
pub use compressor::{Compressed, Compressor};
pub use heuristic::{plan_heuristic, HeuristicPlan};
pub use search::QualitySearch;
pub use types::{
    AnimatedCompressionResult, CompressError, CompressionConstraint, CompressionResult, Outcome,
};

use crate::decode::{AnimationFrame, DecodedImage};

/// Encode `image` at or below `max_bytes` with the default settings.
pub fn compress_to_max_size(
    image: &DecodedImage,
    max_bytes: usize,
) -> Result<CompressionResult, CompressError> {
    Compressor::default().compress_to_max_size(image, max_bytes)
}

/// Size `image` by the Luban heuristic with the default preset.
pub fn compress_by_heuristic(image: &DecodedImage) -> Result<CompressionResult, CompressError> {
    Compressor::default().compress_by_heuristic(image)
}

/// Reduce an animation to at most `max_bytes` with the default settings.
pub fn compress_animated_sequence(
    frames: &[AnimationFrame],
    max_bytes: usize,
) -> Result<AnimatedCompressionResult, CompressError> {
    Compressor::default().compress_animated_sequence(frames, max_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{noise_frames, noise_image};

    #[test]
    fn test_free_functions_use_defaults() {
        let image = noise_image(48, 32, 11);

        let sized = compress_to_max_size(&image, 4_000).unwrap();
        assert!(sized.len() <= 4_000);

        let luban = compress_by_heuristic(&image).unwrap();
        assert_eq!(luban.outcome, Outcome::Unchanged);

        let animated = compress_animated_sequence(&noise_frames(3, 8, 8, 100), 1_000_000).unwrap();
        assert_eq!(animated.outcome, Outcome::WithinBudget);
        assert_eq!(animated.frame_count(), 3);
    }

    #[test]
    fn test_compressor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Compressor>();
    }
}
