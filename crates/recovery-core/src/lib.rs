//! # Recovery Core Library
//!
//! Core logic for a short-break recovery routine recommender. The CLI is a
//! thin presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Scoring**: maps a check-in to a ranked list of six recovery categories
//! - **Recommendation**: filters the routine catalog by hard constraints and
//!   ranks the survivors by the category ranking
//! - **Quota**: one free routine start per calendar day, 30-minute routines
//!   for Pro only
//! - **Player**: a step-timed countdown state machine driven by an async
//!   ticker
//! - **Sessions and reports**: before/after ratings and a rolling weekly
//!   summary
//! - **State**: a persisted app state changed only through a reducer
//!
//! ## Key Components
//!
//! - [`Catalog`]: routine definitions
//! - [`recommend()`]: the recommendation pipeline
//! - [`RoutinePlayer`] and [`Ticker`]: routine execution
//! - [`AppStore`]: state container with persistence
//! - [`Config`]: TOML configuration

pub mod checkin;
pub mod error;
pub mod events;
pub mod player;
pub mod quota;
pub mod recommend;
pub mod report;
pub mod routine;
pub mod scoring;
pub mod session;
pub mod state;
pub mod storage;

pub use checkin::{CheckIn, LastCheckin, Noise, TimeSlot};
pub use error::{CatalogError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use player::{
    format_clock, Clock, CompletedRun, ManualClock, PlayerState, PlayerStatus, RoutinePlayer,
    SystemClock, Ticker,
};
pub use quota::{Admission, FreeDaily, QuotaGate};
pub use recommend::{recommend, Recommendations};
pub use report::{weekly_report, RoutineSummary, WeeklyReport};
pub use routine::{Catalog, CatalogIssue, Effort, Environment, RecoveryType, Routine, RoutineStep, Situation};
pub use scoring::{score_types, TypeScore, TypeScores};
pub use session::{HelpfulTag, Rating, Session};
pub use state::{Action, AppState, AppStore, Outcome, Profile, Salvaged};
pub use storage::{data_dir, Config, JsonFileStore, MemoryStore, StateStore};
