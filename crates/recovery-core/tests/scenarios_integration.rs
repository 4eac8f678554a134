//! Worked scenarios for scoring, the player, the recorder and the filter.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use recovery_core::recommend::filter_routines;
use recovery_core::state::{reduce, ReduceContext};
use recovery_core::{
    score_types, Action, AppState, Catalog, CheckIn, Noise, Outcome, QuotaGate, Rating,
    RecoveryType, RoutinePlayer, Situation, TimeSlot,
};

fn completed_run(catalog: &Catalog, id: &str) -> recovery_core::CompletedRun {
    let mut player = RoutinePlayer::new();
    player.start(catalog.require(id).unwrap().clone());
    while player.completion().is_none() {
        player.tick();
    }
    player.completion().unwrap()
}

#[test]
fn test_scenario_overloaded_checkin_prefers_cognitive() {
    let checkin = CheckIn {
        energy: 2,
        tension: 9,
        overheat: 9,
        urgency: 8,
        noise: Noise::Loud,
        ..Default::default()
    };
    let scores = score_types(&checkin);
    assert_eq!(scores.score_of(RecoveryType::Cognitive), 100);
    assert_eq!(scores.score_of(RecoveryType::Emotion), 100);
    assert_eq!(scores.score_of(RecoveryType::Movement), 100);
    assert_eq!(scores.score_of(RecoveryType::Sensory), 90);
    assert_eq!(scores.score_of(RecoveryType::Planning), 80);
    assert_eq!(scores.score_of(RecoveryType::Flow), 20);
    assert_eq!(scores.primary().key, RecoveryType::Cognitive);
    assert_eq!(scores.secondary().key, RecoveryType::Movement);
}

#[test]
fn test_scenario_player_after_61_ticks() {
    let catalog = Catalog::builtin().unwrap();
    let routine = catalog.require("STUCK_3M_001").unwrap().clone();
    assert!(routine.steps.iter().all(|s| s.seconds == 60));

    let mut player = RoutinePlayer::new();
    player.start(routine);
    for _ in 0..61 {
        player.tick();
    }
    let state = player.state();
    assert_eq!(state.step_index, 1);
    assert_eq!(state.step_remaining, 59);
    assert_eq!(state.total_remaining, 119);
    assert!(state.running);
}

#[test]
fn test_scenario_recorder_delta_and_history_cap() {
    let catalog = Catalog::builtin().unwrap();
    let run = completed_run(&catalog, "MEET_3M_001");
    let start = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    let mut state = AppState::default();

    for i in 0..2001i64 {
        let ctx = ReduceContext {
            now: start + Duration::seconds(i),
            today: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            gate: QuotaGate::default(),
            history_cap: 2000,
        };
        let rating = if i == 2000 { Rating::new(5, 8) } else { Rating::new(1, 1) };
        let outcome = reduce(
            &mut state,
            Action::CompleteSession {
                run: run.clone(),
                checkin: CheckIn::default(),
                rating,
            },
            &ctx,
        )
        .unwrap();
        assert!(matches!(outcome, Outcome::Recorded(_)));
    }

    assert_eq!(state.sessions.len(), 2000);
    assert_eq!(state.sessions[0].delta, 3);
    assert_eq!(state.sessions[0].ts, start + Duration::seconds(2000));
    // The very first session fell off the tail.
    assert_eq!(state.sessions[1999].ts, start + Duration::seconds(1));
    assert_eq!(state.last_checkin.unwrap().ts, start + Duration::seconds(2000));
}

#[test]
fn test_scenario_quiet_room_excludes_noisy_routines() {
    let catalog = Catalog::builtin().unwrap();
    let quiet = CheckIn {
        situation: Situation::AfternoonCrash,
        time_slot: TimeSlot::Three,
        noise: Noise::Quiet,
        ..Default::default()
    };
    let ids = |checkin: &CheckIn| -> Vec<String> {
        filter_routines(&catalog, checkin.situation, checkin.time_slot.minutes(), checkin)
            .into_iter()
            .map(|r| r.id.clone())
            .collect()
    };

    let quiet_ids = ids(&quiet);
    assert!(!quiet_ids.contains(&"AFTER_3M_002".to_string()));
    assert!(quiet_ids.contains(&"AFTER_3M_001".to_string()));

    let normal = CheckIn {
        noise: Noise::Normal,
        ..quiet
    };
    assert!(ids(&normal).contains(&"AFTER_3M_002".to_string()));
}
