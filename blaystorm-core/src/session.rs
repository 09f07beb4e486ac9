//! Play session: owns one student's state bundle, configuration, and RNG.
//!
//! A session processes one submission to completion before accepting the
//! next; the originating UI disables input while a submission is in
//! flight, so no locking is needed here.

use chrono::Utc;

use crate::cascade::{resolve_submission, CascadeOutcome, SessionState};
use crate::config::{CascadeConfig, CascadeConfigError};
use crate::rng::SessionRng;
use crate::submission::{MalformedResultError, RawSubmission, SubmissionResult};

/// One student's active play session.
#[derive(Debug)]
pub struct PlaySession {
    state: SessionState,
    cfg: CascadeConfig,
    rng: SessionRng,
    submissions: u32,
}

impl PlaySession {
    /// Create a session from persisted state and a user-visible seed.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeConfigError`] when the supplied configuration
    /// violates validation rules.
    pub fn new(
        seed: u64,
        cfg: CascadeConfig,
        state: SessionState,
    ) -> Result<Self, CascadeConfigError> {
        cfg.validate()?;
        let mut cfg = cfg;
        cfg.sanitize();
        Ok(Self {
            state,
            cfg,
            rng: SessionRng::from_user_seed(seed),
            submissions: 0,
        })
    }

    /// Normalize a raw scoring payload and run the cascade.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedResultError`] when the payload is missing
    /// required fields; no state is mutated in that case.
    pub fn submit(&mut self, raw: &RawSubmission) -> Result<CascadeOutcome, MalformedResultError> {
        let result = raw.normalize()?;
        Ok(self.submit_result(&result))
    }

    /// Run the cascade for an already-normalized result.
    pub fn submit_result(&mut self, result: &SubmissionResult) -> CascadeOutcome {
        self.submissions = self.submissions.saturating_add(1);
        resolve_submission(
            &mut self.state,
            result,
            &self.cfg,
            &mut self.rng,
            Utc::now(),
        )
    }

    /// Number of submissions processed by this session.
    #[must_use]
    pub const fn submissions(&self) -> u32 {
        self.submissions
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &CascadeConfig {
        &self.cfg
    }

    /// Mutate session state in place (claims, retreat, fixtures).
    pub fn with_state_mut<F: FnOnce(&mut SessionState)>(&mut self, f: F) {
        f(&mut self.state);
    }

    /// Deterministically reseed the session's RNG streams.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SessionRng::from_user_seed(seed);
    }

    /// Consume the session, returning the state bundle for persistence.
    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }
}
