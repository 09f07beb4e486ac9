//! Companion (pet) experience allocation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{COMPANION_FIRST_LEVEL_XP, HAPPINESS_MAX};
use crate::numbers::{floor_f64_to_i64, i64_to_f64};

/// Levels reached in a single allocation, stored inline; multi-level jumps
/// are rare but must not truncate.
pub type LevelGains = SmallVec<[u32; 2]>;

/// Persistent state for the student's active companion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionState {
    pub level: u32,
    pub current_xp: f64,
    pub xp_for_next_level: f64,
    pub happiness: u8,
}

impl Default for CompanionState {
    fn default() -> Self {
        Self {
            level: 1,
            current_xp: 0.0,
            xp_for_next_level: COMPANION_FIRST_LEVEL_XP,
            happiness: 80,
        }
    }
}

impl CompanionState {
    /// Add experience and resolve level-ups.
    ///
    /// The overflow loop keeps consuming thresholds until the remainder
    /// falls short, so one large grant can produce several level-ups. Each
    /// level-up compounds the next threshold by `growth`.
    pub fn grant_xp(&mut self, amount: i64, growth: f64) -> LevelGains {
        let mut gains = LevelGains::new();
        if amount <= 0 {
            return gains;
        }
        self.current_xp += i64_to_f64(amount);
        while self.current_xp >= self.xp_for_next_level {
            self.current_xp -= self.xp_for_next_level;
            self.level = self.level.saturating_add(1);
            self.xp_for_next_level *= growth;
            gains.push(self.level);
        }
        gains
    }

    /// Nudge happiness upward, clamped at the maximum.
    pub fn cheer(&mut self, amount: u8) {
        self.happiness = self.happiness.saturating_add(amount).min(HAPPINESS_MAX);
    }
}

/// Fractional XP share granted to the companion, floored to an integer.
///
/// Uses the base, pre-multiplier XP by design.
#[must_use]
pub fn share_of_base_xp(base_xp: i64, share: f64) -> i64 {
    floor_f64_to_i64(i64_to_f64(base_xp) * share)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_floors_fractional_xp() {
        assert_eq!(share_of_base_xp(100, 0.30), 30);
        assert_eq!(share_of_base_xp(33, 0.30), 9);
        assert_eq!(share_of_base_xp(0, 0.30), 0);
    }

    #[test]
    fn single_level_up_carries_remainder_and_grows_threshold() {
        let mut pet = CompanionState {
            level: 3,
            current_xp: 480.0,
            xp_for_next_level: 500.0,
            happiness: 50,
        };
        let gains = pet.grant_xp(30, 1.5);
        assert_eq!(gains.as_slice(), &[4]);
        assert!((pet.current_xp - 10.0).abs() < 1e-9);
        assert!((pet.xp_for_next_level - 750.0).abs() < 1e-9);
    }

    #[test]
    fn overflow_resolves_multiple_levels_in_one_grant() {
        let mut pet = CompanionState {
            level: 1,
            current_xp: 0.0,
            xp_for_next_level: 100.0,
            happiness: 50,
        };
        // 100 + 150 = 250 consumed by two thresholds; 50 remains.
        let gains = pet.grant_xp(300, 1.5);
        assert_eq!(gains.as_slice(), &[2, 3]);
        assert!((pet.current_xp - 50.0).abs() < 1e-9);
        assert!((pet.xp_for_next_level - 225.0).abs() < 1e-9);
    }

    #[test]
    fn normalized_xp_stays_below_threshold() {
        let mut pet = CompanionState::default();
        pet.current_xp = pet.xp_for_next_level * 2.3;
        let gains = pet.grant_xp(1, 1.5);
        assert!(gains.len() >= 2, "expected at least two level-ups");
        assert!(pet.current_xp < pet.xp_for_next_level);
    }

    #[test]
    fn zero_grant_changes_nothing() {
        let mut pet = CompanionState::default();
        let before = pet.clone();
        assert!(pet.grant_xp(0, 1.5).is_empty());
        assert_eq!(pet, before);
    }

    #[test]
    fn happiness_clamps_at_ceiling() {
        let mut pet = CompanionState {
            happiness: 99,
            ..CompanionState::default()
        };
        pet.cheer(5);
        assert_eq!(pet.happiness, HAPPINESS_MAX);
    }
}
