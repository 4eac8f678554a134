//! Routine player state machine.
//!
//! The player counts down a routine's steps one discrete tick at a time. It
//! does not own a clock or a thread; something else (normally the
//! [`Ticker`](super::Ticker)) calls `tick()` once per elapsed second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |  \
//!            |   Stopped -> (exit) -> Abandoned
//!            v
//!        Completed
//! ```
//!
//! Running, Paused and Stopped all reach Abandoned on `exit()`. `start()`
//! may be called from any state; an unfinished run is abandoned and
//! replaced.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use crate::events::Event;
use crate::routine::Routine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Idle,
    Running,
    Paused,
    /// Halted by the user; can only be exited or replaced.
    Stopped,
    /// Ran to the end. The only state a session can be recorded from.
    Completed,
    Abandoned,
}

impl PlayerStatus {
    /// A run is in progress (possibly paused or stopped).
    pub fn is_active(self) -> bool {
        matches!(
            self,
            PlayerStatus::Running | PlayerStatus::Paused | PlayerStatus::Stopped
        )
    }
}

/// Countdown counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub running: bool,
    pub step_index: usize,
    /// Seconds left in the current step.
    pub step_remaining: u32,
    /// Seconds left in the whole routine.
    pub total_remaining: u32,
}

/// Proof that a routine ran to completion. Only a completed player hands
/// these out, so a session cannot be recorded for an abandoned run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRun {
    routine: Routine,
}

impl CompletedRun {
    pub fn routine(&self) -> &Routine {
        &self.routine
    }
}

/// Event timestamps come from the injected [`Clock`].
#[derive(Clone)]
pub struct RoutinePlayer {
    routine: Option<Routine>,
    state: PlayerState,
    status: PlayerStatus,
    clock: Arc<dyn Clock>,
}

impl Default for RoutinePlayer {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl fmt::Debug for RoutinePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutinePlayer")
            .field("routine", &self.routine.as_ref().map(|r| r.id.as_str()))
            .field("state", &self.state)
            .field("status", &self.status)
            .finish()
    }
}

impl RoutinePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            routine: None,
            state: PlayerState::default(),
            status: PlayerStatus::default(),
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn routine(&self) -> Option<&Routine> {
        self.routine.as_ref()
    }

    pub fn current_step_text(&self) -> Option<&str> {
        self.routine
            .as_ref()?
            .steps
            .get(self.state.step_index)
            .map(|s| s.text.as_str())
    }

    /// 0.0 .. 100.0 progress across the whole routine.
    pub fn progress_pct(&self) -> f64 {
        let total = self.routine.as_ref().map(|r| r.total_seconds()).unwrap_or(0);
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.state.total_remaining);
        (elapsed as f64 / total as f64 * 100.0).min(100.0)
    }

    pub fn snapshot(&self) -> Event {
        Event::PlayerSnapshot {
            status: self.status,
            routine_id: self.routine.as_ref().map(|r| r.id.clone()),
            step_index: self.state.step_index,
            step_text: self.current_step_text().unwrap_or_default().to_string(),
            step_remaining: self.state.step_remaining,
            total_remaining: self.state.total_remaining,
            progress_pct: self.progress_pct(),
            at: self.clock.now(),
        }
    }

    /// The completion token, available only once the countdown finished.
    pub fn completion(&self) -> Option<CompletedRun> {
        if self.status != PlayerStatus::Completed {
            return None;
        }
        Some(CompletedRun {
            routine: self.routine.clone()?,
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, routine: Routine) -> Event {
        if self.status.is_active() {
            if let Some(prev) = &self.routine {
                tracing::debug!(routine_id = %prev.id, "replacing unfinished run");
            }
        }

        let step_remaining = routine.steps.first().map(|s| s.seconds).unwrap_or(0);
        let total = routine.total_seconds();
        let event = Event::RoutineStarted {
            routine_id: routine.id.clone(),
            step_count: routine.steps.len(),
            total_secs: total,
            at: self.clock.now(),
        };

        self.state = PlayerState {
            running: true,
            step_index: 0,
            step_remaining,
            total_remaining: total,
        };
        self.routine = Some(routine);
        self.status = PlayerStatus::Running;
        event
    }

    /// Advance the countdown by one second. A no-op unless running.
    pub fn tick(&mut self) -> Option<Event> {
        if self.status != PlayerStatus::Running {
            return None;
        }
        let routine = self.routine.as_ref()?;

        let next_step = self.state.step_remaining.saturating_sub(1);
        let next_total = self.state.total_remaining.saturating_sub(1);

        if next_total == 0 {
            self.state = PlayerState {
                running: false,
                step_remaining: 0,
                total_remaining: 0,
                ..self.state
            };
            self.status = PlayerStatus::Completed;
            return Some(Event::RoutineCompleted {
                routine_id: routine.id.clone(),
                at: self.clock.now(),
            });
        }

        if next_step == 0 {
            let last = routine.steps.len().saturating_sub(1);
            let index = (self.state.step_index + 1).min(last);
            let step = routine.steps.get(index);
            let step_secs = step.map(|s| s.seconds).unwrap_or(0);
            self.state.step_index = index;
            self.state.step_remaining = step_secs;
            self.state.total_remaining = next_total;
            return Some(Event::StepAdvanced {
                step_index: index,
                step_text: step.map(|s| s.text.clone()).unwrap_or_default(),
                step_secs,
                total_remaining: next_total,
                at: self.clock.now(),
            });
        }

        self.state.step_remaining = next_step;
        self.state.total_remaining = next_total;
        None
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.status {
            PlayerStatus::Running => {
                self.status = PlayerStatus::Paused;
                self.state.running = false;
                Some(Event::PlayerPaused {
                    step_remaining: self.state.step_remaining,
                    total_remaining: self.state.total_remaining,
                    at: self.clock.now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.status {
            PlayerStatus::Paused => {
                self.status = PlayerStatus::Running;
                self.state.running = true;
                Some(Event::PlayerResumed {
                    step_remaining: self.state.step_remaining,
                    total_remaining: self.state.total_remaining,
                    at: self.clock.now(),
                })
            }
            _ => None,
        }
    }

    pub fn stop(&mut self) -> Option<Event> {
        match self.status {
            PlayerStatus::Running | PlayerStatus::Paused => {
                self.status = PlayerStatus::Stopped;
                self.state.running = false;
                Some(Event::PlayerStopped {
                    total_remaining: self.state.total_remaining,
                    at: self.clock.now(),
                })
            }
            _ => None,
        }
    }

    /// Leave the player. An unfinished run becomes Abandoned; a finished
    /// or empty player goes back to Idle.
    pub fn exit(&mut self) -> Option<Event> {
        if self.status.is_active() {
            self.status = PlayerStatus::Abandoned;
            self.state.running = false;
            let routine_id = self.routine.as_ref().map(|r| r.id.clone()).unwrap_or_default();
            tracing::debug!(routine_id = %routine_id, "routine abandoned");
            return Some(Event::RoutineAbandoned {
                routine_id,
                at: self.clock.now(),
            });
        }
        *self = Self::with_clock(Arc::clone(&self.clock));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_support::routine;
    use crate::routine::{RecoveryType, RoutineStep, Situation};

    fn three_minutes() -> Routine {
        routine("R3", Situation::Stuck, 3, RecoveryType::Planning)
    }

    fn run_ticks(player: &mut RoutinePlayer, n: usize) {
        for _ in 0..n {
            player.tick();
        }
    }

    #[test]
    fn start_initialises_counters() {
        let mut p = RoutinePlayer::new();
        assert_eq!(p.status(), PlayerStatus::Idle);
        let ev = p.start(three_minutes());
        assert!(matches!(ev, Event::RoutineStarted { total_secs: 180, step_count: 3, .. }));
        assert_eq!(
            p.state(),
            PlayerState { running: true, step_index: 0, step_remaining: 60, total_remaining: 180 }
        );
    }

    #[test]
    fn sixty_one_ticks_move_into_second_step() {
        let mut p = RoutinePlayer::new();
        p.start(three_minutes());
        run_ticks(&mut p, 61);
        let s = p.state();
        assert_eq!((s.step_index, s.step_remaining, s.total_remaining), (1, 59, 119));
        assert_eq!(p.current_step_text(), Some("step 1"));
    }

    #[test]
    fn step_boundary_emits_step_advanced() {
        let mut p = RoutinePlayer::new();
        p.start(three_minutes());
        run_ticks(&mut p, 59);
        match p.tick() {
            Some(Event::StepAdvanced { step_index, step_secs, total_remaining, .. }) => {
                assert_eq!((step_index, step_secs, total_remaining), (1, 60, 120));
            }
            other => panic!("expected StepAdvanced, got {other:?}"),
        }
    }

    #[test]
    fn completes_after_total_seconds_and_then_ignores_ticks() {
        let mut p = RoutinePlayer::new();
        p.start(three_minutes());
        run_ticks(&mut p, 179);
        assert_eq!(p.status(), PlayerStatus::Running);
        assert!(matches!(p.tick(), Some(Event::RoutineCompleted { .. })));
        assert_eq!(p.status(), PlayerStatus::Completed);
        assert_eq!(
            p.state(),
            PlayerState { running: false, step_index: 2, step_remaining: 0, total_remaining: 0 }
        );
        assert!(p.tick().is_none());
        assert_eq!(p.state().total_remaining, 0);
        assert!((p.progress_pct() - 100.0).abs() < f64::EPSILON);
        assert!(p.completion().is_some());
    }

    #[test]
    fn pause_freezes_counters_until_resume() {
        let mut p = RoutinePlayer::new();
        p.start(three_minutes());
        run_ticks(&mut p, 10);
        assert!(p.pause().is_some());
        run_ticks(&mut p, 30);
        assert_eq!(p.state().total_remaining, 170);
        assert!(!p.state().running);
        assert!(p.resume().is_some());
        p.tick();
        assert_eq!(p.state().total_remaining, 169);
        assert_eq!(p.state().step_remaining, 49);
    }

    #[test]
    fn stop_then_exit_abandons_without_completion() {
        let mut p = RoutinePlayer::new();
        p.start(three_minutes());
        run_ticks(&mut p, 5);
        assert!(p.stop().is_some());
        assert!(p.resume().is_none());
        run_ticks(&mut p, 5);
        assert_eq!(p.state().total_remaining, 175);
        assert!(matches!(p.exit(), Some(Event::RoutineAbandoned { .. })));
        assert_eq!(p.status(), PlayerStatus::Abandoned);
        assert!(p.completion().is_none());
    }

    #[test]
    fn exit_after_completion_resets_to_idle() {
        let mut p = RoutinePlayer::new();
        p.start(three_minutes());
        run_ticks(&mut p, 180);
        assert!(p.exit().is_none());
        assert_eq!(p.status(), PlayerStatus::Idle);
        assert!(p.routine().is_none());
    }

    #[test]
    fn start_replaces_an_unfinished_run() {
        let mut p = RoutinePlayer::new();
        p.start(three_minutes());
        run_ticks(&mut p, 70);
        let mut short = three_minutes();
        short.id = "SHORT".into();
        short.steps = vec![RoutineStep { text: "only".into(), seconds: 5 }];
        p.start(short);
        assert_eq!(
            p.state(),
            PlayerState { running: true, step_index: 0, step_remaining: 5, total_remaining: 5 }
        );
        assert_eq!(p.routine().map(|r| r.id.as_str()), Some("SHORT"));
    }

    #[test]
    fn uneven_steps_advance_on_their_own_lengths() {
        let mut r = three_minutes();
        r.steps = vec![
            RoutineStep { text: "a".into(), seconds: 2 },
            RoutineStep { text: "b".into(), seconds: 1 },
            RoutineStep { text: "c".into(), seconds: 3 },
        ];
        let mut p = RoutinePlayer::new();
        p.start(r);
        p.tick();
        p.tick();
        assert_eq!((p.state().step_index, p.state().total_remaining), (1, 4));
        p.tick();
        assert_eq!((p.state().step_index, p.state().step_remaining), (2, 3));
        run_ticks(&mut p, 3);
        assert_eq!(p.status(), PlayerStatus::Completed);
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut p = RoutinePlayer::new();
        p.start(three_minutes());
        run_ticks(&mut p, 90);
        match p.snapshot() {
            Event::PlayerSnapshot { status, step_index, progress_pct, routine_id, .. } => {
                assert_eq!(status, PlayerStatus::Running);
                assert_eq!(step_index, 1);
                assert_eq!(routine_id.as_deref(), Some("R3"));
                assert!((progress_pct - 50.0).abs() < 1e-9);
            }
            other => panic!("expected PlayerSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn event_times_come_from_the_injected_clock() {
        use crate::player::ManualClock;
        use chrono::{Duration, TimeZone, Utc};

        let t0 = Utc.with_ymd_and_hms(2025, 3, 4, 9, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(t0));
        let mut p = RoutinePlayer::with_clock(clock.clone());

        let started = p.start(three_minutes());
        assert!(matches!(started, Event::RoutineStarted { at, .. } if at == t0));

        clock.advance(Duration::seconds(180));
        let last = (0..180).filter_map(|_| p.tick()).last();
        assert!(matches!(last, Some(Event::RoutineCompleted { at, .. }) if at == t0 + Duration::seconds(180)));

        assert!(p.exit().is_none());
        clock.advance(Duration::seconds(5));
        let restarted = p.start(three_minutes());
        assert!(matches!(restarted, Event::RoutineStarted { at, .. } if at == t0 + Duration::seconds(185)));
    }
}
