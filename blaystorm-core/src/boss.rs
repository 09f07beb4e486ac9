//! Boss encounter damage resolution.
//!
//! Boss encounters are a bounded mini-game: each correct answer converts
//! the multiplier-adjusted score into damage against an opponent health
//! pool. The encounter is a two-exit state machine; both exits are
//! terminal and damage on a finished encounter is a no-op.

use serde::{Deserialize, Serialize};

use crate::config::CascadeConfigError;
use crate::constants::{DEFAULT_BOSS_DAMAGE_PER_DIFFICULTY, DEFAULT_BOSS_FLAT_DAMAGE};
use crate::numbers::{floor_f64_to_i64, i64_to_f64};

/// Encounter lifecycle: `Engaged -> Defeated` or `Engaged -> Abandoned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BossPhase {
    #[default]
    Engaged,
    Defeated,
    Abandoned,
}

/// Opponent health pool for one boss-mode session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossEncounterState {
    pub name: String,
    pub max_health: i64,
    pub current_health: i64,
    #[serde(default)]
    pub phase: BossPhase,
}

/// One resolved hit against the boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossStrike {
    pub damage: i64,
    pub remaining_health: i64,
    /// Set on the strike that brought health to zero.
    pub defeated: bool,
}

/// Damage formula parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossDamageCfg {
    #[serde(default = "BossDamageCfg::default_flat")]
    pub flat: i64,
    #[serde(default = "BossDamageCfg::default_per_difficulty")]
    pub per_difficulty: i64,
}

impl BossDamageCfg {
    const fn default_flat() -> i64 {
        DEFAULT_BOSS_FLAT_DAMAGE
    }

    const fn default_per_difficulty() -> i64 {
        DEFAULT_BOSS_DAMAGE_PER_DIFFICULTY
    }

    pub(crate) fn validate(&self) -> Result<(), CascadeConfigError> {
        for (field, value) in [
            ("boss.flat", self.flat),
            ("boss.per_difficulty", self.per_difficulty),
        ] {
            if value < 0 {
                return Err(CascadeConfigError::NegativeAmount { field, value });
            }
        }
        Ok(())
    }

    pub(crate) fn sanitize(&mut self) {
        self.flat = self.flat.max(0);
        self.per_difficulty = self.per_difficulty.max(0);
    }
}

impl Default for BossDamageCfg {
    fn default() -> Self {
        Self {
            flat: Self::default_flat(),
            per_difficulty: Self::default_per_difficulty(),
        }
    }
}

impl BossEncounterState {
    #[must_use]
    pub fn new(name: &str, max_health: i64) -> Self {
        let max_health = max_health.max(1);
        Self {
            name: name.to_string(),
            max_health,
            current_health: max_health,
            phase: BossPhase::Engaged,
        }
    }

    /// Whether the encounter has reached a terminal phase.
    #[must_use]
    pub fn is_over(&self) -> bool {
        !matches!(self.phase, BossPhase::Engaged)
    }

    /// Apply multiplier-adjusted damage for one correct answer.
    ///
    /// Health is clamped at zero and the defeat transition happens at most
    /// once; calls after the encounter is over return `None` without
    /// touching state.
    pub fn apply_answer_damage(
        &mut self,
        difficulty: u32,
        multiplier: f64,
        cfg: &BossDamageCfg,
    ) -> Option<BossStrike> {
        if self.is_over() {
            return None;
        }
        let base = cfg.flat + cfg.per_difficulty * i64::from(difficulty);
        let damage = floor_f64_to_i64(i64_to_f64(base) * multiplier).max(0);
        self.current_health = (self.current_health - damage).max(0);
        let defeated = self.current_health == 0;
        if defeated {
            self.phase = BossPhase::Defeated;
        }
        Some(BossStrike {
            damage,
            remaining_health: self.current_health,
            defeated,
        })
    }

    /// Player retreat. Terminal; only valid while engaged.
    pub fn abandon(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        self.phase = BossPhase::Abandoned;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_formula_scales_with_difficulty_and_multiplier() {
        let mut boss = BossEncounterState::new("Fraction Dragon", 1_000);
        let strike = boss
            .apply_answer_damage(2, 1.25, &BossDamageCfg::default())
            .expect("engaged");
        // (10 + 2*5) * 1.25 = 25
        assert_eq!(strike.damage, 25);
        assert_eq!(strike.remaining_health, 975);
        assert!(!strike.defeated);
    }

    #[test]
    fn health_clamps_at_zero_and_defeat_fires_once() {
        let mut boss = BossEncounterState::new("Decimal Golem", 30);
        let strike = boss
            .apply_answer_damage(5, 1.0, &BossDamageCfg::default())
            .expect("engaged");
        assert_eq!(strike.remaining_health, 0);
        assert!(strike.defeated);
        assert_eq!(boss.phase, BossPhase::Defeated);

        assert!(
            boss.apply_answer_damage(5, 3.0, &BossDamageCfg::default())
                .is_none(),
            "damage on a defeated boss is a no-op"
        );
        assert_eq!(boss.current_health, 0);
    }

    #[test]
    fn abandon_is_terminal_and_blocks_damage() {
        let mut boss = BossEncounterState::new("Integer Imp", 50);
        assert!(boss.abandon());
        assert!(!boss.abandon());
        assert!(boss
            .apply_answer_damage(1, 1.0, &BossDamageCfg::default())
            .is_none());
        assert_eq!(boss.current_health, boss.max_health);
    }

    #[test]
    fn new_encounter_enforces_positive_health() {
        let boss = BossEncounterState::new("Null Wisp", 0);
        assert_eq!(boss.max_health, 1);
        assert_eq!(boss.current_health, 1);
    }
}
