//! Scoring module - score, destroyed-rectangle count and level
//!
//! [`Progress`] is the accumulator threaded through the rectangle removal loop.
//! Every removal is scored with the level in effect *before* that removal can
//! trigger a level-up, so the ordering is explicit in [`Progress::record_removal`].
//!
//! Score formula per removed rectangle:
//!
//! `points = round(area * (level * 0.15 + 1) * multiplier)`
//!
//! Rounding is half-to-even. The multiplier defaults to 1.0.

use crate::types::{LEVEL_SCORE_BONUS, RECTANGLES_PER_LEVEL};

/// Points and level of a single removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalScore {
    pub points: u64,
    /// Level used to compute `points`
    pub level: u32,
    /// True when this removal raised the level for the following ones
    pub leveled_up: bool,
}

/// Score, destroyed-rectangle count and level of one grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    scores: u64,
    destroyed_rectangles: u32,
    level: u32,
    multiplier: f64,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            scores: 0,
            destroyed_rectangles: 0,
            level: 1,
            multiplier: 1.0,
        }
    }

    pub fn scores(&self) -> u64 {
        self.scores
    }

    pub fn destroyed_rectangles(&self) -> u32 {
        self.destroyed_rectangles
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Scale the points of every following removal.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is negative or not finite.
    pub fn set_multiplier(&mut self, multiplier: f64) {
        assert!(
            multiplier.is_finite() && multiplier >= 0.0,
            "score multiplier must be a finite non-negative number, got {multiplier}"
        );
        self.multiplier = multiplier;
    }

    /// Score one removed rectangle, then count it.
    pub fn record_removal(&mut self, area: usize) -> RemovalScore {
        let level = self.level;
        let points = removal_points(area, level, self.multiplier);

        self.scores = self.scores.saturating_add(points);
        self.destroyed_rectangles += 1;

        let leveled_up = self.destroyed_rectangles % RECTANGLES_PER_LEVEL == 0;
        if leveled_up {
            self.level += 1;
        }

        RemovalScore {
            points,
            level,
            leveled_up,
        }
    }

    /// Reset the score only. Level and destroyed count are kept.
    pub fn reset_scores(&mut self) {
        self.scores = 0;
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

/// Points for a removed rectangle of `area` cells at `level`
pub fn removal_points(area: usize, level: u32, multiplier: f64) -> u64 {
    let raw = area as f64 * (level as f64 * LEVEL_SCORE_BONUS + 1.0) * multiplier;
    raw.round_ties_even() as u64
}

/// Tick interval for `level`: `base_ms` shortened by `speedup` for every level above 1.
pub fn tick_interval_ms(level: u32, base_ms: u64, speedup: f64) -> u64 {
    let steps = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    let interval = base_ms as f64 * speedup.powi(steps);
    interval.round().max(1.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_points_at_level_one() {
        assert_eq!(removal_points(9, 1, 1.0), 10);
        assert_eq!(removal_points(20, 1, 1.0), 23);
    }

    #[test]
    fn test_removal_points_round_half_to_even() {
        // 10 * 1.15 is exactly 11.5 in binary floating point
        assert_eq!(removal_points(10, 1, 1.0), 12);
        assert_eq!(removal_points(9, 10, 1.0), 22);
        assert_eq!(removal_points(10, 3, 1.0), 14);
        assert_eq!(removal_points(10, 5, 1.0), 18);
    }

    #[test]
    fn test_removal_points_with_multiplier() {
        assert_eq!(removal_points(20, 1, 0.6), 14);
        assert_eq!(removal_points(20, 1, 0.0), 0);
    }

    #[test]
    fn test_level_increments_every_ten_removals() {
        let mut progress = Progress::new();
        for i in 1..=9 {
            let score = progress.record_removal(9);
            assert_eq!(score.level, 1);
            assert!(!score.leveled_up, "removal {} should not level up", i);
        }

        // The tenth removal is still scored at level 1
        let tenth = progress.record_removal(9);
        assert_eq!(tenth.level, 1);
        assert!(tenth.leveled_up);
        assert_eq!(progress.level(), 2);

        let eleventh = progress.record_removal(10);
        assert_eq!(eleventh.level, 2);
        assert_eq!(eleventh.points, 13);
        assert_eq!(progress.destroyed_rectangles(), 11);
    }

    #[test]
    fn test_reset_scores_keeps_level() {
        let mut progress = Progress::new();
        for _ in 0..10 {
            progress.record_removal(9);
        }
        assert_eq!(progress.scores(), 100);

        progress.reset_scores();
        assert_eq!(progress.scores(), 0);
        assert_eq!(progress.level(), 2);
        assert_eq!(progress.destroyed_rectangles(), 10);
    }

    #[test]
    #[should_panic]
    fn test_negative_multiplier_panics() {
        Progress::new().set_multiplier(-1.0);
    }

    #[test]
    fn test_tick_interval_shrinks_with_level() {
        assert_eq!(tick_interval_ms(1, 500, 0.85), 500);
        assert_eq!(tick_interval_ms(2, 500, 0.85), 425);
        assert_eq!(tick_interval_ms(3, 500, 0.85), 361);
        assert!(tick_interval_ms(200, 500, 0.85) >= 1);
    }
}
