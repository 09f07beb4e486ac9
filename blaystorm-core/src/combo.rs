//! Combo streak tracking and the derived reward multiplier.

use serde::{Deserialize, Serialize};

use crate::constants::{COMBO_BASE_MULTIPLIER, COMBO_MILESTONES, COMBO_MULTIPLIER_BANDS};
use crate::numbers::{floor_f64_to_i64, i64_to_f64};

/// Streak state for one active play session.
///
/// `max` is a monotonic high-water mark; `current` resets to zero on any
/// incorrect answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ComboState {
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub max: u32,
}

/// Outcome of advancing the streak by one correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboAdvance {
    /// Streak length after the increment.
    pub combo: u32,
    /// Set when the increment crossed a milestone breakpoint.
    pub milestone: bool,
}

impl ComboState {
    /// Advance the streak for a correct answer.
    ///
    /// Milestones fire only on the exact crossing; the streak advances one
    /// step per answer, so each milestone fires at most once per streak.
    pub fn record_correct(&mut self) -> ComboAdvance {
        self.current = self.current.saturating_add(1);
        if self.current > self.max {
            self.max = self.current;
        }
        ComboAdvance {
            combo: self.current,
            milestone: COMBO_MILESTONES.contains(&self.current),
        }
    }

    /// Reset the streak for an incorrect answer.
    ///
    /// Returns the pre-reset streak length when a non-empty streak was
    /// broken; `max` is untouched.
    pub fn record_incorrect(&mut self) -> Option<u32> {
        if self.current == 0 {
            return None;
        }
        let lost = self.current;
        self.current = 0;
        Some(lost)
    }

    /// Reward multiplier derived from the current streak.
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        multiplier_for(self.current)
    }
}

/// Multiplier breakpoint lookup; the highest qualifying band wins.
#[must_use]
pub fn multiplier_for(combo: u32) -> f64 {
    for &(threshold, multiplier) in COMBO_MULTIPLIER_BANDS {
        if combo >= threshold {
            return multiplier;
        }
    }
    COMBO_BASE_MULTIPLIER
}

/// Scale a base reward by the streak multiplier, flooring to an integer.
#[must_use]
pub fn scale_reward(base: i64, multiplier: f64) -> i64 {
    floor_f64_to_i64(i64_to_f64(base) * multiplier)
}
