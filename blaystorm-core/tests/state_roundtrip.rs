//! Persistence-shape tests: state bundles and configs must survive JSON
//! round-trips and accept sparse documents from older saves.

use blaystorm_core::cascade::{SessionMode, SessionState};
use blaystorm_core::{
    BossEncounterState, CascadeConfig, CompanionState, PlaySession, Quest, QuestPredicate,
    RawSubmission, SeasonalProgressState,
};

fn raw_correct(base_xp: i64) -> RawSubmission {
    RawSubmission {
        is_correct: Some(true),
        time_spent_seconds: Some(9.0),
        base_xp_earned: Some(base_xp),
        base_coins_earned: Some(base_xp / 2),
        estimated_time_seconds: Some(15.0),
        difficulty: Some(2),
        did_level_up: Some(false),
        new_level: None,
    }
}

#[test]
fn empty_document_deserializes_to_default_state() {
    let state: SessionState = serde_json::from_str("{}").expect("sparse document");
    assert_eq!(state, SessionState::default());
    assert_eq!(state.mode, SessionMode::Practice);
    assert!(state.companion.is_none());
    assert!(state.quests.is_empty());
}

#[test]
fn empty_document_deserializes_to_default_config() {
    let cfg: CascadeConfig = serde_json::from_str("{}").expect("sparse document");
    assert_eq!(cfg, CascadeConfig::default());
    assert!(cfg.validate().is_ok());
}

#[test]
fn populated_state_round_trips_losslessly() {
    let mut state = SessionState {
        mode: SessionMode::Boss,
        quests: vec![Quest {
            id: "weekly-streak".to_string(),
            predicate: QuestPredicate::ComboLength,
            target_value: 15,
            current_progress: 6,
            is_claimed: false,
        }],
        companion: Some(CompanionState {
            level: 4,
            current_xp: 33.5,
            xp_for_next_level: 337.5,
            happiness: 91,
        }),
        season: SeasonalProgressState {
            current_level: 12,
            current_xp: 44.0,
            xp_for_next_level: 800.0,
        },
        boss: Some(BossEncounterState::new("Fraction Dragon", 500)),
        ..SessionState::default()
    };
    state.combo.current = 6;
    state.combo.max = 9;
    state.logs.push("log.combo.milestone".to_string());

    let json = serde_json::to_string(&state).expect("serialize");
    let restored: SessionState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, state);
}

#[test]
fn quest_claim_flow_via_session() {
    let mut state = SessionState::default();
    state.quests.push(Quest {
        id: "daily-two".to_string(),
        predicate: QuestPredicate::ProblemCount,
        target_value: 2,
        current_progress: 0,
        is_claimed: false,
    });
    let mut session =
        PlaySession::new(11, CascadeConfig::default(), state).expect("valid config");

    session.submit(&raw_correct(10)).expect("processed");
    session.with_state_mut(|state| {
        assert!(state.quests[0].claim().is_err(), "not yet complete");
    });
    session.submit(&raw_correct(10)).expect("processed");
    session.with_state_mut(|state| {
        state.quests[0].claim().expect("complete and unclaimed");
        assert!(state.quests[0].claim().is_err(), "claim is one-way");
    });

    // A claimed quest no longer moves.
    session.submit(&raw_correct(10)).expect("processed");
    assert_eq!(session.state().quests[0].current_progress, 2);
    assert!(session.state().quests[0].is_claimed);
}

#[test]
fn session_state_survives_persistence_mid_run() {
    let cfg = CascadeConfig::default();
    let mut session =
        PlaySession::new(42, cfg.clone(), SessionState::default()).expect("valid config");
    for _ in 0..5 {
        session.submit(&raw_correct(40)).expect("processed");
    }
    let json = serde_json::to_string(session.state()).expect("serialize");

    let restored: SessionState = serde_json::from_str(&json).expect("deserialize");
    let resumed = PlaySession::new(42, cfg, restored).expect("valid config");
    assert_eq!(resumed.state().combo.current, 5);
    assert_eq!(resumed.state().combo.max, 5);
    assert_eq!(resumed.state().season.current_level, 1);
}
