//! Results, constraints and errors of the compression operations.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Errors surfaced by the compression operations.
///
/// Running out of resolution before meeting a budget is not an error; it is
/// reported through [`Outcome::ResolutionExhausted`].
#[derive(Debug, Error)]
pub enum CompressError {
    /// Source bytes are not a valid image.
    #[error("Decode failed: {0}")]
    DecodeFailed(#[from] DecodeError),

    /// The encoder rejected the raster or quality parameter.
    #[error("Encode failed: {0}")]
    EncodeFailed(#[from] EncodeError),

    /// Input is neither a recognised static nor animated container.
    #[error("Unsupported image format")]
    UnsupportedFormat,

    /// A byte budget of zero was requested.
    #[error("Byte budget must be greater than zero")]
    InvalidBudget,

    /// The compressor was built from an unusable configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The caller raised the cancel flag between encode attempts.
    #[error("Compression cancelled")]
    Cancelled,
}

/// How a compression call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Output was produced and meets the byte budget.
    WithinBudget,
    /// The input already satisfied the constraint and was passed through.
    Unchanged,
    /// Downscaling hit its floor before the budget was met; the smallest
    /// encoding found is returned instead.
    ResolutionExhausted,
}

impl Outcome {
    /// Whether the output honours the requested budget.
    pub fn is_within_budget(self) -> bool {
        !matches!(self, Outcome::ResolutionExhausted)
    }
}

/// Output of a still-image compression.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// Encoded output.
    pub bytes: Vec<u8>,
    /// Final width in pixels.
    pub width: u32,
    /// Final height in pixels.
    pub height: u32,
    /// Quality factor of the final encode (1.0 when nothing was re-encoded).
    pub quality: f32,
    /// Wall-clock time spent in the call.
    pub elapsed: Duration,
    pub outcome: Outcome,
}

impl CompressionResult {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Output of an animated-sequence compression.
#[derive(Debug, Clone)]
pub struct AnimatedCompressionResult {
    /// Encoded GIF.
    pub bytes: Vec<u8>,
    /// Final canvas width in pixels.
    pub width: u32,
    /// Final canvas height in pixels.
    pub height: u32,
    /// Display time of every frame written, in order.
    pub frame_durations: Vec<Duration>,
    /// Every `sample_count`-th source frame was kept (1 = all frames).
    pub sample_count: usize,
    /// Wall-clock time spent in the call.
    pub elapsed: Duration,
    pub outcome: Outcome,
}

impl AnimatedCompressionResult {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn frame_count(&self) -> usize {
        self.frame_durations.len()
    }

    /// Sum of all frame durations.
    pub fn total_duration(&self) -> Duration {
        self.frame_durations.iter().sum()
    }
}

/// What the caller wants the output to satisfy.
///
/// With neither field set, the Luban heuristic picks the budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressionConstraint {
    /// Ceiling on the encoded size, in bytes.
    pub max_bytes: Option<usize>,
    /// Ceiling on the longer pixel edge.
    pub max_long_edge: Option<u32>,
}

impl CompressionConstraint {
    pub fn max_bytes(max_bytes: usize) -> Self {
        Self {
            max_bytes: Some(max_bytes),
            max_long_edge: None,
        }
    }

    pub fn max_long_edge(max_long_edge: u32) -> Self {
        Self {
            max_bytes: None,
            max_long_edge: Some(max_long_edge),
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn with_max_long_edge(mut self, max_long_edge: u32) -> Self {
        self.max_long_edge = Some(max_long_edge);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_within_budget() {
        assert!(Outcome::WithinBudget.is_within_budget());
        assert!(Outcome::Unchanged.is_within_budget());
        assert!(!Outcome::ResolutionExhausted.is_within_budget());
    }

    #[test]
    fn test_constraint_builders() {
        let c = CompressionConstraint::max_bytes(150_000).with_max_long_edge(2048);
        assert_eq!(c.max_bytes, Some(150_000));
        assert_eq!(c.max_long_edge, Some(2048));
        assert_eq!(CompressionConstraint::default().max_bytes, None);
        assert_eq!(CompressionConstraint::max_long_edge(64).max_bytes, None);
    }

    #[test]
    fn test_animated_totals() {
        let result = AnimatedCompressionResult {
            bytes: b"GIF89a".to_vec(),
            width: 1,
            height: 1,
            frame_durations: vec![Duration::from_millis(200), Duration::from_millis(100)],
            sample_count: 3,
            elapsed: Duration::ZERO,
            outcome: Outcome::WithinBudget,
        };
        assert_eq!(result.len(), 6);
        assert!(!result.is_empty());
        assert_eq!(result.frame_count(), 2);
        assert_eq!(result.total_duration(), Duration::from_millis(300));
    }

    #[test]
    fn test_error_display() {
        let err = CompressError::from(EncodeError::InvalidDimensions { width: 0, height: 3 });
        assert!(err.to_string().starts_with("Encode failed"));
        assert_eq!(CompressError::Cancelled.to_string(), "Compression cancelled");
    }
}
