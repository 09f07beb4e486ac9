//! BlayStorm Cascade Engine
//!
//! Platform-agnostic reward-cascade logic for the BlayStorm math-learning
//! game. This crate derives every secondary effect of a scored answer
//! (combo and multiplier, quest progress, companion and season XP, treasure
//! drops, boss damage) as a single synchronous state transition, without
//! UI or persistence dependencies.

pub mod boss;
pub mod cascade;
pub mod combo;
pub mod companion;
pub mod config;
pub mod constants;
pub mod notify;
pub mod numbers;
pub mod quest;
pub mod rng;
pub mod season;
pub mod session;
pub mod submission;
pub mod treasure;

// Re-export commonly used types
pub use boss::{BossDamageCfg, BossEncounterState, BossPhase, BossStrike};
pub use cascade::{
    resolve_submission, resolve_submission_with_sources, CascadeOutcome, ScaledRewards,
    SessionMode, SessionState,
};
pub use combo::{multiplier_for, scale_reward, ComboAdvance, ComboState};
pub use companion::{share_of_base_xp, CompanionState, LevelGains};
pub use config::{CascadeConfig, CascadeConfigError, XpGrowthCfg, XpShareCfg};
pub use notify::{CascadeEvent, NotificationRecord};
pub use quest::{Quest, QuestError, QuestPredicate, QuestProgress};
pub use rng::{CountingRng, RandomSource, RandomSourceError, SessionRng, UnitSequence};
pub use season::SeasonalProgressState;
pub use session::PlaySession;
pub use submission::{MalformedResultError, RawSubmission, SubmissionResult};
pub use treasure::{
    roll_drop, Rarity, RarityWeights, Reward, RewardContainer, TreasureCfg, TreasureError,
};

/// Trait for abstracting session persistence.
/// Platform-specific implementations should provide this.
pub trait SessionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a session's state bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    fn save_session(&self, save_name: &str, state: &SessionState) -> Result<(), Self::Error>;

    /// Load a session's state bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be loaded.
    fn load_session(&self, save_name: &str) -> Result<Option<SessionState>, Self::Error>;

    /// Delete a saved session.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_session(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Engine binding the cascade to caller-provided persistence.
pub struct CascadeEngine<S>
where
    S: SessionStore,
{
    store: S,
    cfg: CascadeConfig,
}

impl<S> CascadeEngine<S>
where
    S: SessionStore,
{
    /// Create a new engine with the provided store and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeConfigError`] when the configuration is invalid.
    pub fn new(store: S, cfg: CascadeConfig) -> Result<Self, CascadeConfigError> {
        cfg.validate()?;
        let mut cfg = cfg;
        cfg.sanitize();
        Ok(Self { store, cfg })
    }

    /// Start a fresh session with the given seed and mode.
    ///
    /// # Errors
    ///
    /// Never fails for a validated engine configuration; kept fallible to
    /// match [`PlaySession::new`].
    pub fn create_session(
        &self,
        seed: u64,
        mode: SessionMode,
    ) -> Result<PlaySession, CascadeConfigError> {
        let state = SessionState {
            mode,
            ..SessionState::default()
        };
        PlaySession::new(seed, self.cfg.clone(), state)
    }

    /// Persist a session's state bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the save.
    pub fn save_session(&self, save_name: &str, state: &SessionState) -> Result<(), S::Error> {
        self.store.save_session(save_name, state)
    }

    /// Resume a previously saved session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the saved bundle cannot be
    /// re-bound to the engine configuration.
    pub fn resume_session(
        &self,
        save_name: &str,
        seed: u64,
    ) -> Result<Option<PlaySession>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let Some(state) = self.store.load_session(save_name).map_err(Into::into)? else {
            return Ok(None);
        };
        let session = PlaySession::new(seed, self.cfg.clone(), state)?;
        Ok(Some(session))
    }
}
