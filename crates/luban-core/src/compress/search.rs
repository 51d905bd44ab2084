//! Bounded binary search over the encoder quality factor.

use crate::config::MIN_QUALITY_STEP;

/// Binary search for the highest quality whose encoding fits a budget.
///
/// The caller drives it: ask for [`next_quality`](Self::next_quality),
/// encode at that quality, then [`record`](Self::record) whether the result
/// fit. A fitting attempt raises the lower bound, anything else lowers the
/// upper bound, so the interval halves on every step.
///
/// The search ends when the iteration budget is spent, when the interval is
/// narrower than one encoder step, or when the upper bound has fallen to the
/// quality floor without anything fitting.
#[derive(Debug, Clone)]
pub struct QualitySearch {
    low: f32,
    high: f32,
    remaining: u32,
    floor: f32,
    best: Option<f32>,
}

impl QualitySearch {
    pub fn new(iterations: u32, floor: f32) -> Self {
        Self {
            low: 0.0,
            high: 1.0,
            remaining: iterations,
            floor,
            best: None,
        }
    }

    /// Quality to try next, or `None` once the search is over.
    pub fn next_quality(&self) -> Option<f32> {
        if self.remaining == 0 || self.high - self.low < MIN_QUALITY_STEP {
            return None;
        }
        if self.best.is_none() && self.high <= self.floor {
            return None;
        }
        Some((self.low + self.high) / 2.0)
    }

    /// Record the outcome of encoding at `quality`.
    pub fn record(&mut self, quality: f32, fits: bool) {
        if fits {
            self.low = quality;
            self.best = Some(quality);
        } else {
            self.high = quality;
        }
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Current `(low, high)` bounds.
    pub fn interval(&self) -> (f32, f32) {
        (self.low, self.high)
    }

    /// Highest quality recorded as fitting.
    pub fn best(&self) -> Option<f32> {
        self.best
    }

    /// True when nothing fit and the upper bound reached the floor.
    pub fn hit_floor(&self) -> bool {
        self.best.is_none() && self.high <= self.floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive a search where everything at or below `threshold` fits.
    fn run(iterations: u32, floor: f32, threshold: f32) -> (QualitySearch, Vec<f32>) {
        let mut search = QualitySearch::new(iterations, floor);
        let mut tried = Vec::new();
        while let Some(q) = search.next_quality() {
            tried.push(q);
            search.record(q, q <= threshold);
        }
        (search, tried)
    }

    #[test]
    fn test_first_probe_is_midpoint() {
        let search = QualitySearch::new(8, 0.06);
        assert_eq!(search.next_quality(), Some(0.5));
    }

    #[test]
    fn test_converges_toward_threshold() {
        let (search, tried) = run(8, 0.06, 0.7);
        let best = search.best().unwrap();

        assert!(best <= 0.7);
        assert!(0.7 - best < 0.02, "best={best}");
        assert!(tried.len() <= 8);
    }

    #[test]
    fn test_stops_at_floor_when_nothing_fits() {
        let (search, tried) = run(16, 0.06, -1.0);

        assert!(search.best().is_none());
        assert!(search.hit_floor());
        // 0.5, 0.25, 0.125, 0.0625, 0.03125
        assert_eq!(tried.len(), 5);
    }

    #[test]
    fn test_stops_when_interval_below_encoder_step() {
        let (_, tried) = run(16, 0.0, 0.333);
        // The interval halves every probe; after 7 probes it is 1/128 < 0.01.
        assert_eq!(tried.len(), 7);
    }

    #[test]
    fn test_zero_iterations_never_probes() {
        assert_eq!(QualitySearch::new(0, 0.06).next_quality(), None);
    }
}
