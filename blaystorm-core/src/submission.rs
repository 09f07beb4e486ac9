//! Scoring input adapter.
//!
//! Normalizes the raw payload returned by the answer-scoring API into the
//! cascade's input contract. Pure mapping; a malformed payload fails the
//! invocation before any session state is touched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MIN_DIFFICULTY;

/// Raw scoring payload as delivered by the answer-submission endpoint.
///
/// Every field is optional because the transport cannot guarantee shape;
/// [`RawSubmission::normalize`] enforces the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawSubmission {
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub time_spent_seconds: Option<f64>,
    #[serde(default)]
    pub base_xp_earned: Option<i64>,
    #[serde(default)]
    pub base_coins_earned: Option<i64>,
    #[serde(default)]
    pub estimated_time_seconds: Option<f64>,
    #[serde(default)]
    pub difficulty: Option<u32>,
    #[serde(default)]
    pub did_level_up: Option<bool>,
    #[serde(default)]
    pub new_level: Option<u32>,
}

/// Normalized result of one scored problem attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub is_correct: bool,
    pub time_spent_seconds: f64,
    pub base_xp_earned: i64,
    pub base_coins_earned: i64,
    pub estimated_time_seconds: f64,
    pub difficulty: u32,
    pub did_level_up: bool,
    pub new_level: Option<u32>,
}

impl SubmissionResult {
    /// Whether the answer beat the problem's par time.
    #[must_use]
    pub fn beat_par_time(&self) -> bool {
        self.is_correct && self.time_spent_seconds < self.estimated_time_seconds
    }
}

/// Input payload rejected by the adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedResultError {
    #[error("required field missing: {field}")]
    MissingField { field: &'static str },
    #[error("{field} must be non-negative (got {value})")]
    NegativeAmount { field: &'static str, value: i64 },
    #[error("{field} must be finite and non-negative (got {value})")]
    InvalidDuration { field: &'static str, value: f64 },
    #[error("difficulty must be at least {min} (got {value})")]
    InvalidDifficulty { min: u32, value: u32 },
}

impl RawSubmission {
    /// Normalize the raw payload into a [`SubmissionResult`].
    ///
    /// # Errors
    ///
    /// Returns [`MalformedResultError`] when a required field is absent or
    /// carries an out-of-contract value.
    pub fn normalize(&self) -> Result<SubmissionResult, MalformedResultError> {
        let is_correct = self
            .is_correct
            .ok_or(MalformedResultError::MissingField { field: "is_correct" })?;
        let time_spent_seconds = require_duration("time_spent_seconds", self.time_spent_seconds)?;
        let estimated_time_seconds =
            require_duration("estimated_time_seconds", self.estimated_time_seconds)?;
        let base_xp_earned = require_amount("base_xp_earned", self.base_xp_earned)?;
        let base_coins_earned = require_amount("base_coins_earned", self.base_coins_earned)?;
        let difficulty = self
            .difficulty
            .ok_or(MalformedResultError::MissingField { field: "difficulty" })?;
        if difficulty < MIN_DIFFICULTY {
            return Err(MalformedResultError::InvalidDifficulty {
                min: MIN_DIFFICULTY,
                value: difficulty,
            });
        }

        Ok(SubmissionResult {
            is_correct,
            time_spent_seconds,
            base_xp_earned,
            base_coins_earned,
            estimated_time_seconds,
            difficulty,
            did_level_up: self.did_level_up.unwrap_or(false),
            new_level: self.new_level,
        })
    }
}

fn require_duration(
    field: &'static str,
    value: Option<f64>,
) -> Result<f64, MalformedResultError> {
    let value = value.ok_or(MalformedResultError::MissingField { field })?;
    if !value.is_finite() || value < 0.0 {
        return Err(MalformedResultError::InvalidDuration { field, value });
    }
    Ok(value)
}

fn require_amount(field: &'static str, value: Option<i64>) -> Result<i64, MalformedResultError> {
    let value = value.ok_or(MalformedResultError::MissingField { field })?;
    if value < 0 {
        return Err(MalformedResultError::NegativeAmount { field, value });
    }
    Ok(value)
}
