//! The reward cascade: one scored submission in, one consistent state
//! transition out.
//!
//! Every applicable component runs on every invocation; a component whose
//! precondition is unmet (no companion, not in boss mode) is skipped, never
//! failed, and no component can short-circuit another. The cascade performs
//! no I/O: the caller persists the returned state and renders the returned
//! notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::boss::BossEncounterState;
use crate::combo::{scale_reward, ComboState};
use crate::companion::{share_of_base_xp, CompanionState};
use crate::config::CascadeConfig;
use crate::constants::LOG_TREASURE_ROLL_SKIPPED;
use crate::notify::{CascadeEvent, NotificationLog, NotificationRecord};
use crate::quest::Quest;
use crate::rng::{RandomSource, SessionRng};
use crate::season::SeasonalProgressState;
use crate::submission::SubmissionResult;
use crate::treasure::roll_drop;

/// Play mode for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    #[default]
    Practice,
    Boss,
}

impl SessionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Boss => "boss",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one session owns; no state is shared across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionState {
    #[serde(default)]
    pub mode: SessionMode,
    #[serde(default)]
    pub combo: ComboState,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub companion: Option<CompanionState>,
    #[serde(default)]
    pub season: SeasonalProgressState,
    #[serde(default)]
    pub boss: Option<BossEncounterState>,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Multiplier-scaled primary rewards for the submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledRewards {
    pub multiplier: f64,
    pub xp_awarded: i64,
    pub coins_awarded: i64,
}

/// Result of one cascade invocation; state is mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    pub rewards: ScaledRewards,
    pub notifications: Vec<NotificationRecord>,
}

/// Run the full reward cascade using the session's own RNG streams.
pub fn resolve_submission(
    state: &mut SessionState,
    result: &SubmissionResult,
    cfg: &CascadeConfig,
    rng: &mut SessionRng,
    now: DateTime<Utc>,
) -> CascadeOutcome {
    let (drop_rng, loot_rng) = rng.streams();
    resolve_submission_with_sources(state, result, cfg, drop_rng, loot_rng, now)
}

/// Run the full reward cascade with caller-injected random sources.
///
/// Notification order is fixed: combo, quests, companion, season, treasure,
/// boss, with the scoring adapter's own player-level event ahead of the
/// combo group. A failing random source degrades the treasure roll to "no
/// drop"; every other component is unaffected.
pub fn resolve_submission_with_sources(
    state: &mut SessionState,
    result: &SubmissionResult,
    cfg: &CascadeConfig,
    drop_rng: &mut dyn RandomSource,
    loot_rng: &mut dyn RandomSource,
    now: DateTime<Utc>,
) -> CascadeOutcome {
    let mut log = NotificationLog::new(now);

    if result.did_level_up {
        let level = result.new_level.unwrap_or(0);
        emit(state, &mut log, CascadeEvent::PlayerLeveledUp { level });
    }

    // Rewards scale by the streak entering this answer; the increment
    // below only affects the next submission. Milestone events still
    // announce the band just reached.
    let multiplier;
    if result.is_correct {
        multiplier = state.combo.multiplier();
        let advance = state.combo.record_correct();
        if advance.milestone {
            emit(
                state,
                &mut log,
                CascadeEvent::ComboMilestone {
                    combo: advance.combo,
                    multiplier: state.combo.multiplier(),
                },
            );
        }
    } else {
        if let Some(lost_combo) = state.combo.record_incorrect() {
            emit(state, &mut log, CascadeEvent::ComboBroken { lost_combo });
        }
        multiplier = state.combo.multiplier();
    }
    let rewards = ScaledRewards {
        multiplier,
        xp_awarded: scale_reward(result.base_xp_earned, multiplier),
        coins_awarded: scale_reward(result.base_coins_earned, multiplier),
    };

    run_quests(state, result, &mut log);
    run_companion(state, result, cfg, &mut log);
    run_season(state, result, cfg, &mut log);
    run_treasure(state, result, cfg, drop_rng, loot_rng, &mut log);
    run_boss(state, result, cfg, multiplier, &mut log);

    CascadeOutcome {
        rewards,
        notifications: log.into_records(),
    }
}

fn emit(state: &mut SessionState, log: &mut NotificationLog, event: CascadeEvent) {
    state.logs.push(event.log_key().to_string());
    log.push(event);
}

fn run_quests(state: &mut SessionState, result: &SubmissionResult, log: &mut NotificationLog) {
    let combo = state.combo;
    let mut completed = Vec::new();
    for quest in &mut state.quests {
        if let Some(progress) = quest.apply_submission(result, &combo) {
            if progress.completed_now {
                completed.push((progress.quest_id, progress.target_value));
            }
        }
    }
    for (quest_id, target_value) in completed {
        emit(
            state,
            log,
            CascadeEvent::QuestCompleted {
                quest_id,
                target_value,
            },
        );
    }
}

fn run_companion(
    state: &mut SessionState,
    result: &SubmissionResult,
    cfg: &CascadeConfig,
    log: &mut NotificationLog,
) {
    if !result.is_correct {
        return;
    }
    let Some(companion) = state.companion.as_mut() else {
        return;
    };
    companion.cheer(cfg.happiness_per_correct);
    let amount = share_of_base_xp(result.base_xp_earned, cfg.shares.companion);
    let gains = companion.grant_xp(amount, cfg.growth.companion);
    for level in gains {
        emit(state, log, CascadeEvent::CompanionLeveledUp { level });
    }
}

fn run_season(
    state: &mut SessionState,
    result: &SubmissionResult,
    cfg: &CascadeConfig,
    log: &mut NotificationLog,
) {
    if !result.is_correct {
        return;
    }
    let amount = share_of_base_xp(result.base_xp_earned, cfg.shares.season);
    let gains = state
        .season
        .grant_xp(amount, cfg.growth.season, cfg.season_max_level);
    for level in gains {
        emit(state, log, CascadeEvent::SeasonLevelUp { level });
    }
}

fn run_treasure(
    state: &mut SessionState,
    result: &SubmissionResult,
    cfg: &CascadeConfig,
    drop_rng: &mut dyn RandomSource,
    loot_rng: &mut dyn RandomSource,
    log: &mut NotificationLog,
) {
    if !result.is_correct {
        return;
    }
    match roll_drop(&cfg.treasure, drop_rng, loot_rng) {
        Ok(Some(container)) => emit(state, log, CascadeEvent::TreasureFound { container }),
        Ok(None) => {}
        Err(_) => state.logs.push(LOG_TREASURE_ROLL_SKIPPED.to_string()),
    }
}

fn run_boss(
    state: &mut SessionState,
    result: &SubmissionResult,
    cfg: &CascadeConfig,
    multiplier: f64,
    log: &mut NotificationLog,
) {
    if state.mode != SessionMode::Boss || !result.is_correct {
        return;
    }
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    let boss_name = boss.name.clone();
    if let Some(strike) = boss.apply_answer_damage(result.difficulty, multiplier, &cfg.boss) {
        if strike.defeated {
            emit(state, log, CascadeEvent::BossDefeated { boss_name });
        } else {
            emit(
                state,
                log,
                CascadeEvent::DamageDealt {
                    damage: strike.damage,
                    remaining_health: strike.remaining_health,
                },
            );
        }
    }
}
