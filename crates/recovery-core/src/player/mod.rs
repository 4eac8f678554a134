//! Routine execution: the countdown state machine, its tick source and the
//! clock abstraction.

mod clock;
mod engine;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{CompletedRun, PlayerState, PlayerStatus, RoutinePlayer};
pub use ticker::{Ticker, DEFAULT_TICK_PERIOD};

/// Render seconds as `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
