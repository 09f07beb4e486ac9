//! Cascade configuration: serde-backed knobs with validation and
//! sanitization, so partial JSON configs always resolve to a playable set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boss::BossDamageCfg;
use crate::constants::{
    DEFAULT_COMPANION_SHARE, DEFAULT_HAPPINESS_PER_CORRECT, DEFAULT_SEASON_MAX_LEVEL,
    DEFAULT_SEASON_SHARE, DEFAULT_XP_GROWTH,
};
use crate::treasure::TreasureCfg;

/// Errors raised when cascade configuration invariants are violated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CascadeConfigError {
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be non-negative (got {value})")]
    NegativeAmount { field: &'static str, value: i64 },
    #[error("season max level must be at least 1")]
    SeasonCapZero,
    #[error("rarity weight table sums to zero")]
    EmptyRarityTable,
    #[error("rarity weights must decrease as rarity climbs")]
    RarityWeightsNotDecreasing,
}

/// Fractional XP shares carved off the base (pre-multiplier) XP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XpShareCfg {
    #[serde(default = "XpShareCfg::default_companion")]
    pub companion: f64,
    #[serde(default = "XpShareCfg::default_season")]
    pub season: f64,
}

impl XpShareCfg {
    const fn default_companion() -> f64 {
        DEFAULT_COMPANION_SHARE
    }

    const fn default_season() -> f64 {
        DEFAULT_SEASON_SHARE
    }

    fn validate(&self) -> Result<(), CascadeConfigError> {
        for (field, value) in [
            ("shares.companion", self.companion),
            ("shares.season", self.season),
        ] {
            if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                return Err(CascadeConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        Ok(())
    }

    fn sanitize(&mut self) {
        if !self.companion.is_finite() {
            self.companion = Self::default_companion();
        }
        if !self.season.is_finite() {
            self.season = Self::default_season();
        }
        self.companion = self.companion.clamp(0.0, 1.0);
        self.season = self.season.clamp(0.0, 1.0);
    }
}

impl Default for XpShareCfg {
    fn default() -> Self {
        Self {
            companion: Self::default_companion(),
            season: Self::default_season(),
        }
    }
}

/// Threshold growth factors applied after each level-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XpGrowthCfg {
    #[serde(default = "XpGrowthCfg::default_growth")]
    pub companion: f64,
    #[serde(default = "XpGrowthCfg::default_growth")]
    pub season: f64,
}

impl XpGrowthCfg {
    const fn default_growth() -> f64 {
        DEFAULT_XP_GROWTH
    }

    fn validate(&self) -> Result<(), CascadeConfigError> {
        for (field, value) in [
            ("growth.companion", self.companion),
            ("growth.season", self.season),
        ] {
            if !(1.0..=10.0).contains(&value) || !value.is_finite() {
                return Err(CascadeConfigError::RangeViolation {
                    field,
                    min: 1.0,
                    max: 10.0,
                    value,
                });
            }
        }
        Ok(())
    }

    fn sanitize(&mut self) {
        if !self.companion.is_finite() || self.companion < 1.0 {
            self.companion = Self::default_growth();
        }
        if !self.season.is_finite() || self.season < 1.0 {
            self.season = Self::default_growth();
        }
    }
}

impl Default for XpGrowthCfg {
    fn default() -> Self {
        Self {
            companion: Self::default_growth(),
            season: Self::default_growth(),
        }
    }
}

/// Full configuration for one cascade-driven session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeConfig {
    #[serde(default)]
    pub shares: XpShareCfg,
    #[serde(default)]
    pub growth: XpGrowthCfg,
    #[serde(default = "CascadeConfig::default_season_max_level")]
    pub season_max_level: u32,
    #[serde(default = "CascadeConfig::default_happiness_per_correct")]
    pub happiness_per_correct: u8,
    #[serde(default)]
    pub treasure: TreasureCfg,
    #[serde(default)]
    pub boss: BossDamageCfg,
}

impl CascadeConfig {
    const fn default_season_max_level() -> u32 {
        DEFAULT_SEASON_MAX_LEVEL
    }

    const fn default_happiness_per_correct() -> u8 {
        DEFAULT_HAPPINESS_PER_CORRECT
    }

    /// Validate configuration invariants before sanitization.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeConfigError`] when any field violates the
    /// documented bounds.
    pub fn validate(&self) -> Result<(), CascadeConfigError> {
        self.shares.validate()?;
        self.growth.validate()?;
        if self.season_max_level == 0 {
            return Err(CascadeConfigError::SeasonCapZero);
        }
        self.treasure.validate()?;
        self.boss.validate()?;
        Ok(())
    }

    /// Clamp out-of-range values back into playable bounds.
    pub fn sanitize(&mut self) {
        self.shares.sanitize();
        self.growth.sanitize();
        if self.season_max_level == 0 {
            self.season_max_level = Self::default_season_max_level();
        }
        self.treasure.sanitize();
        self.boss.sanitize();
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            shares: XpShareCfg::default(),
            growth: XpGrowthCfg::default(),
            season_max_level: Self::default_season_max_level(),
            happiness_per_correct: Self::default_happiness_per_correct(),
            treasure: TreasureCfg::default(),
            boss: BossDamageCfg::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = CascadeConfig::default();
        cfg.validate().expect("defaults valid");
        assert!((cfg.shares.companion - 0.30).abs() < f64::EPSILON);
        assert!((cfg.shares.season - 0.50).abs() < f64::EPSILON);
        assert!((cfg.treasure.drop_chance - 0.05).abs() < f64::EPSILON);
        assert_eq!(cfg.season_max_level, 100);
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let cfg: CascadeConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(cfg, CascadeConfig::default());
        cfg.validate().expect("defaults valid");
    }

    #[test]
    fn out_of_range_share_is_rejected_then_sanitized() {
        let mut cfg = CascadeConfig {
            shares: XpShareCfg {
                companion: 1.4,
                season: 0.5,
            },
            ..CascadeConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(CascadeConfigError::RangeViolation {
                field: "shares.companion",
                ..
            })
        ));
        cfg.sanitize();
        assert!((cfg.shares.companion - 1.0).abs() < f64::EPSILON);
        cfg.validate().expect("sanitized config valid");
    }

    #[test]
    fn zero_season_cap_is_rejected() {
        let cfg = CascadeConfig {
            season_max_level: 0,
            ..CascadeConfig::default()
        };
        assert_eq!(cfg.validate(), Err(CascadeConfigError::SeasonCapZero));
    }

    #[test]
    fn growth_below_one_is_rejected() {
        let cfg = CascadeConfig {
            growth: XpGrowthCfg {
                companion: 0.9,
                season: 1.5,
            },
            ..CascadeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
