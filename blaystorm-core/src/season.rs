//! Seasonal progression (battle pass) track.

use serde::{Deserialize, Serialize};

use crate::companion::LevelGains;
use crate::constants::SEASON_FIRST_LEVEL_XP;
use crate::numbers::i64_to_f64;

/// Long-lived XP track unlocking tiered rewards over a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProgressState {
    pub current_level: u32,
    pub current_xp: f64,
    pub xp_for_next_level: f64,
}

impl Default for SeasonalProgressState {
    fn default() -> Self {
        Self {
            current_level: 1,
            current_xp: 0.0,
            xp_for_next_level: SEASON_FIRST_LEVEL_XP,
        }
    }
}

impl SeasonalProgressState {
    /// Whether the track has reached the season's level cap.
    #[must_use]
    pub fn at_cap(&self, max_level: u32) -> bool {
        self.current_level >= max_level
    }

    /// Add experience with the same overflow loop as the companion track,
    /// bounded by the season's maximum level.
    ///
    /// Once the cap is reached, surplus XP is discarded and no further
    /// level gains are reported.
    pub fn grant_xp(&mut self, amount: i64, growth: f64, max_level: u32) -> LevelGains {
        let mut gains = LevelGains::new();
        if amount <= 0 || self.at_cap(max_level) {
            return gains;
        }
        self.current_xp += i64_to_f64(amount);
        while self.current_xp >= self.xp_for_next_level {
            self.current_xp -= self.xp_for_next_level;
            self.current_level = self.current_level.saturating_add(1);
            self.xp_for_next_level *= growth;
            gains.push(self.current_level);
            if self.at_cap(max_level) {
                self.current_xp = 0.0;
                break;
            }
        }
        gains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_levels_compound_threshold() {
        let mut season = SeasonalProgressState {
            current_level: 1,
            current_xp: 190.0,
            xp_for_next_level: 200.0,
        };
        let gains = season.grant_xp(20, 1.5, 100);
        assert_eq!(gains.as_slice(), &[2]);
        assert!((season.current_xp - 10.0).abs() < 1e-9);
        assert!((season.xp_for_next_level - 300.0).abs() < 1e-9);
    }

    #[test]
    fn cap_discards_surplus_xp() {
        let mut season = SeasonalProgressState {
            current_level: 99,
            current_xp: 0.0,
            xp_for_next_level: 100.0,
        };
        let gains = season.grant_xp(10_000, 1.5, 100);
        assert_eq!(gains.as_slice(), &[100]);
        assert!((season.current_xp - 0.0).abs() < f64::EPSILON);

        let more = season.grant_xp(500, 1.5, 100);
        assert!(more.is_empty(), "no gains past the cap");
        assert!((season.current_xp - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn multi_level_jump_reports_each_level() {
        let mut season = SeasonalProgressState {
            current_level: 1,
            current_xp: 0.0,
            xp_for_next_level: 100.0,
        };
        let gains = season.grant_xp(260, 1.5, 100);
        assert_eq!(gains.as_slice(), &[2, 3]);
    }
}
