use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::player::PlayerStatus;

/// Every player state change produces an Event.
/// The presentation layer renders them; the ticker forwards them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RoutineStarted {
        routine_id: String,
        step_count: usize,
        total_secs: u32,
        at: DateTime<Utc>,
    },
    StepAdvanced {
        step_index: usize,
        step_text: String,
        step_secs: u32,
        total_remaining: u32,
        at: DateTime<Utc>,
    },
    PlayerPaused {
        step_remaining: u32,
        total_remaining: u32,
        at: DateTime<Utc>,
    },
    PlayerResumed {
        step_remaining: u32,
        total_remaining: u32,
        at: DateTime<Utc>,
    },
    /// Stopped without completing; exiting now abandons the run.
    PlayerStopped {
        total_remaining: u32,
        at: DateTime<Utc>,
    },
    RoutineAbandoned {
        routine_id: String,
        at: DateTime<Utc>,
    },
    RoutineCompleted {
        routine_id: String,
        at: DateTime<Utc>,
    },
    PlayerSnapshot {
        status: PlayerStatus,
        routine_id: Option<String>,
        step_index: usize,
        step_text: String,
        step_remaining: u32,
        total_remaining: u32,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
