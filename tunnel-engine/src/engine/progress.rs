//! Scroll fraction to path progress, with per-frame exponential smoothing.

use constants::tunnel::{DEFAULT_SMOOTHING_FACTOR, MIN_SMOOTHING_FACTOR};
use serde::{Deserialize, Serialize};

use crate::engine::math::interpolate;

/// Output interval the scroll fraction is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressRange {
    pub min: f32,
    pub max: f32,
    /// Looped ranges are read modulo 1 by cue evaluation.
    #[serde(default)]
    pub looped: bool,
}

impl Default for ProgressRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            looped: false,
        }
    }
}

impl ProgressRange {
    pub fn map_fraction(&self, fraction: f32) -> f32 {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        interpolate(fraction, self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressState {
    pub target: f32,
    pub current: f32,
}

#[derive(Debug, Clone)]
pub struct ProgressMapper {
    range: ProgressRange,
    smoothing_factor: f32,
    state: ProgressState,
}

impl ProgressMapper {
    pub fn new(range: ProgressRange, smoothing_factor: f32) -> Self {
        let smoothing_factor = if smoothing_factor.is_finite() {
            smoothing_factor.clamp(MIN_SMOOTHING_FACTOR, 1.0)
        } else {
            DEFAULT_SMOOTHING_FACTOR
        };
        let start = range.map_fraction(0.0);
        Self {
            range,
            smoothing_factor,
            state: ProgressState {
                target: start,
                current: start,
            },
        }
    }

    pub fn range(&self) -> ProgressRange {
        self.range
    }

    pub fn smoothing_factor(&self) -> f32 {
        self.smoothing_factor
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn set_scroll_fraction(&mut self, fraction: f32) {
        self.state.target = self.range.map_fraction(fraction);
    }

    /// Advance `current` one frame toward `target` and return it.
    pub fn step(&mut self) -> f32 {
        let state = &mut self.state;
        state.current += (state.target - state.current) * self.smoothing_factor;
        state.current
    }

    pub fn snap(&mut self) {
        self.state.current = self.state.target;
    }

    /// Progress as cue evaluation sees it: wrapped into `[0, 1)` on looped ranges.
    pub fn looped_progress(&self) -> f32 {
        if self.range.looped {
            self.state.current.rem_euclid(1.0)
        } else {
            self.state.current
        }
    }
}

impl Default for ProgressMapper {
    fn default() -> Self {
        Self::new(ProgressRange::default(), DEFAULT_SMOOTHING_FACTOR)
    }
}
