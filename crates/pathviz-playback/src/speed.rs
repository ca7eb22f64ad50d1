//! Replay speed: per-tick delay and skip-ahead policy.

use std::fmt;
use std::time::Duration;

/// Slowest speed.
pub const MIN_SPEED: u32 = 1;
/// Fastest speed.
pub const MAX_SPEED: u32 = 1000;
/// Speed a fresh session starts at.
pub const DEFAULT_SPEED: u32 = 50;
/// Speed set by fast-forward.
pub const FAST_FORWARD_SPEED: u32 = 300;
/// Above this speed a tick may jump several steps.
pub const SKIP_THRESHOLD: u32 = 500;
/// Steps advanced per tick while skipping.
pub const SKIP_STRIDE: usize = 5;
/// The last this-many steps are always applied one by one.
pub const SKIP_TAIL: usize = 10;
/// Shortest delay between ticks.
pub const MIN_DELAY: Duration = Duration::from_millis(50);

/// A replay speed in `MIN_SPEED..=MAX_SPEED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Speed(u32);

impl Speed {
    pub const DEFAULT: Self = Self(DEFAULT_SPEED);
    pub const FAST_FORWARD: Self = Self(FAST_FORWARD_SPEED);

    /// Clamp `value` into range.
    pub const fn new(value: u32) -> Self {
        if value < MIN_SPEED {
            Self(MIN_SPEED)
        } else if value > MAX_SPEED {
            Self(MAX_SPEED)
        } else {
            Self(value)
        }
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Time between two ticks: `1000 - min(speed * 5, 950)` ms, never below
    /// [`MIN_DELAY`].
    pub fn delay(self) -> Duration {
        let ms = 1000 - (self.0 * 5).min(950);
        Duration::from_millis(u64::from(ms)).max(MIN_DELAY)
    }

    /// Whether ticks at this speed may jump several steps.
    #[inline]
    pub const fn skips(self) -> bool {
        self.0 > SKIP_THRESHOLD
    }

    /// The index to show after `index` in a trace of `len` steps.
    ///
    /// Without skipping this is `index + 1`. While skipping, ticks move
    /// [`SKIP_STRIDE`] steps at a time but stop at `len - SKIP_TAIL`, so
    /// the tail of the trace, terminal step included, is shown step by
    /// step.
    pub fn next_index(self, index: usize, len: usize) -> usize {
        if self.skips() && index + SKIP_TAIL < len {
            (index + SKIP_STRIDE).min(len - SKIP_TAIL)
        } else {
            index + 1
        }
    }

    /// One notch faster, for keyboard control.
    pub fn faster(self) -> Self {
        Self::new(self.0.saturating_add(self.notch()))
    }

    /// One notch slower.
    pub fn slower(self) -> Self {
        Self::new(self.0.saturating_sub(self.notch()))
    }

    fn notch(self) -> u32 {
        match self.0 {
            0..=49 => 5,
            50..=199 => 25,
            _ => 50,
        }
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for Speed {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_range() {
        assert_eq!(Speed::new(0).get(), 1);
        assert_eq!(Speed::new(5000).get(), 1000);
        assert_eq!(Speed::default().get(), 50);
    }

    #[test]
    fn delay_curve() {
        assert_eq!(Speed::new(1).delay(), Duration::from_millis(995));
        assert_eq!(Speed::new(50).delay(), Duration::from_millis(750));
        assert_eq!(Speed::new(100).delay(), Duration::from_millis(500));
        assert_eq!(Speed::new(190).delay(), Duration::from_millis(50));
        assert_eq!(Speed::new(300).delay(), Duration::from_millis(50));
        assert_eq!(Speed::new(1000).delay(), Duration::from_millis(50));
    }

    #[test]
    fn no_skipping_at_or_below_threshold() {
        let s = Speed::new(500);
        assert!(!s.skips());
        assert_eq!(s.next_index(0, 100), 1);
    }

    #[test]
    fn skipping_stops_short_of_the_tail() {
        let s = Speed::new(800);
        assert_eq!(s.next_index(0, 100), 5);
        assert_eq!(s.next_index(88, 100), 90);
        assert_eq!(s.next_index(90, 100), 91);
        assert_eq!(s.next_index(99, 100), 100);
        // Short traces are never skipped.
        assert_eq!(s.next_index(0, 8), 1);
    }

    #[test]
    fn every_skip_walk_hits_the_last_step() {
        for len in 1..60 {
            let s = Speed::new(1000);
            let mut i = 0;
            let mut shown = Vec::new();
            while i < len {
                shown.push(i);
                i = s.next_index(i, len);
            }
            assert_eq!(shown.last(), Some(&(len - 1)), "len {len}");
            assert!(shown.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn notches_stay_in_range() {
        assert_eq!(Speed::new(1000).faster().get(), 1000);
        assert_eq!(Speed::new(1).slower().get(), 1);
        assert_eq!(Speed::new(50).faster().get(), 75);
        assert_eq!(Speed::new(50).slower().get(), 25);
    }
}
