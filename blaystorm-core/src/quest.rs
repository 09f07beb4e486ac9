//! Quest progress tracking.
//!
//! Quests arrive from persistence with their predicate and targets already
//! resolved; the cascade only advances progress and reports first-time
//! completions. Claiming a finished quest is a separate, one-way action.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combo::ComboState;
use crate::submission::SubmissionResult;

/// Predicate evaluated against each scored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestPredicate {
    /// One unit of progress per correct answer.
    ProblemCount,
    /// Progress tracks the longest streak reached so far.
    ComboLength,
    /// One unit per correct answer faster than the quest's own threshold.
    TimeUnderThreshold { threshold_seconds: f64 },
    /// One unit per correct answer faster than the problem's par time.
    UnderParTime,
}

/// Quest state progressed by the cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub predicate: QuestPredicate,
    pub target_value: u32,
    #[serde(default)]
    pub current_progress: u32,
    #[serde(default)]
    pub is_claimed: bool,
}

/// Progress delta reported back to the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestProgress {
    pub quest_id: String,
    pub progress: u32,
    pub target_value: u32,
    /// Set the first time progress reaches the target.
    pub completed_now: bool,
}

/// Invalid claim transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error("quest {id} already claimed")]
    AlreadyClaimed { id: String },
    #[error("quest {id} not complete ({progress}/{target})")]
    NotComplete { id: String, progress: u32, target: u32 },
}

impl Quest {
    /// Whether progress has reached the target.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_progress >= self.target_value
    }

    /// Evaluate the quest predicate against one scored submission.
    ///
    /// Claimed quests are skipped entirely. Progress is monotonically
    /// non-decreasing and clamped at the target; streak quests track the
    /// session's high-water streak so a broken combo never rolls progress
    /// back. Returns `None` when nothing changed.
    pub fn apply_submission(
        &mut self,
        result: &SubmissionResult,
        combo: &ComboState,
    ) -> Option<QuestProgress> {
        if self.is_claimed {
            return None;
        }
        let was_complete = self.is_complete();
        let candidate = match &self.predicate {
            QuestPredicate::ProblemCount => {
                if result.is_correct {
                    self.current_progress.saturating_add(1)
                } else {
                    self.current_progress
                }
            }
            QuestPredicate::ComboLength => self.current_progress.max(combo.current),
            QuestPredicate::TimeUnderThreshold { threshold_seconds } => {
                if result.is_correct && result.time_spent_seconds < *threshold_seconds {
                    self.current_progress.saturating_add(1)
                } else {
                    self.current_progress
                }
            }
            QuestPredicate::UnderParTime => {
                if result.beat_par_time() {
                    self.current_progress.saturating_add(1)
                } else {
                    self.current_progress
                }
            }
        };
        let next = candidate.min(self.target_value);
        if next == self.current_progress {
            return None;
        }
        self.current_progress = next;
        Some(QuestProgress {
            quest_id: self.id.clone(),
            progress: self.current_progress,
            target_value: self.target_value,
            completed_now: !was_complete && self.is_complete(),
        })
    }

    /// Claim a completed quest. One-way transition.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError`] when the quest is unfinished or already
    /// claimed.
    pub fn claim(&mut self) -> Result<(), QuestError> {
        if self.is_claimed {
            return Err(QuestError::AlreadyClaimed {
                id: self.id.clone(),
            });
        }
        if !self.is_complete() {
            return Err(QuestError::NotComplete {
                id: self.id.clone(),
                progress: self.current_progress,
                target: self.target_value,
            });
        }
        self.is_claimed = true;
        Ok(())
    }
}
