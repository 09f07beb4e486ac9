//! Notification records produced by one cascade invocation.
//!
//! The cascade separates "what happened" from "how it's shown": these
//! records are pure data handed back to the caller for rendering and
//! persistence, in a fixed component order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    LOG_BOSS_DAMAGE, LOG_BOSS_DEFEATED, LOG_COMBO_BROKEN, LOG_COMBO_MILESTONE,
    LOG_COMPANION_LEVEL_UP, LOG_PLAYER_LEVEL_UP, LOG_QUEST_COMPLETED, LOG_SEASON_LEVEL_UP,
    LOG_TREASURE_FOUND,
};
use crate::treasure::RewardContainer;

/// Effect payloads, one variant per user-facing outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CascadeEvent {
    PlayerLeveledUp { level: u32 },
    ComboBroken { lost_combo: u32 },
    ComboMilestone { combo: u32, multiplier: f64 },
    QuestCompleted { quest_id: String, target_value: u32 },
    CompanionLeveledUp { level: u32 },
    SeasonLevelUp { level: u32 },
    TreasureFound { container: RewardContainer },
    DamageDealt { damage: i64, remaining_health: i64 },
    BossDefeated { boss_name: String },
}

impl CascadeEvent {
    /// Stable key used in the session log stream.
    #[must_use]
    pub const fn log_key(&self) -> &'static str {
        match self {
            Self::PlayerLeveledUp { .. } => LOG_PLAYER_LEVEL_UP,
            Self::ComboBroken { .. } => LOG_COMBO_BROKEN,
            Self::ComboMilestone { .. } => LOG_COMBO_MILESTONE,
            Self::QuestCompleted { .. } => LOG_QUEST_COMPLETED,
            Self::CompanionLeveledUp { .. } => LOG_COMPANION_LEVEL_UP,
            Self::SeasonLevelUp { .. } => LOG_SEASON_LEVEL_UP,
            Self::TreasureFound { .. } => LOG_TREASURE_FOUND,
            Self::DamageDealt { .. } => LOG_BOSS_DAMAGE,
            Self::BossDefeated { .. } => LOG_BOSS_DEFEATED,
        }
    }
}

/// One ordered notification within a cascade invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Position within the invocation, starting at zero.
    pub sequence: u32,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: CascadeEvent,
}

/// Append-only collector for one invocation.
///
/// All records in an invocation share its timestamp; `sequence`
/// disambiguates ordering.
#[derive(Debug)]
pub(crate) struct NotificationLog {
    created_at: DateTime<Utc>,
    records: Vec<NotificationRecord>,
}

impl NotificationLog {
    pub(crate) fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            records: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, event: CascadeEvent) {
        let sequence = u32::try_from(self.records.len()).unwrap_or(u32::MAX);
        self.records.push(NotificationRecord {
            sequence,
            created_at: self.created_at,
            event,
        });
    }

    pub(crate) fn into_records(self) -> Vec<NotificationRecord> {
        self.records
    }
}
