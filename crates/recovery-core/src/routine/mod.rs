//! Routine definitions and the routine catalog.
//!
//! A routine is a short, step-timed recovery exercise aimed at one
//! situation and one recovery category. Routines are loaded once and never
//! mutated.

mod catalog;

pub use catalog::{Catalog, CatalogIssue};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Work situation a check-in (and a routine) is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    MeetingPre,
    AfternoonCrash,
    Stuck,
    BeforeLeave,
}

impl Situation {
    pub const ALL: [Situation; 4] = [
        Situation::MeetingPre,
        Situation::AfternoonCrash,
        Situation::Stuck,
        Situation::BeforeLeave,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Situation::MeetingPre => "meeting_pre",
            Situation::AfternoonCrash => "afternoon_crash",
            Situation::Stuck => "stuck",
            Situation::BeforeLeave => "before_leave",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Situation::MeetingPre => "Before a meeting",
            Situation::AfternoonCrash => "Afternoon crash",
            Situation::Stuck => "Stuck on work",
            Situation::BeforeLeave => "Before leaving",
        }
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Situation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Situation::ALL
            .into_iter()
            .find(|v| v.key() == s)
            .ok_or_else(|| format!("unknown situation '{s}' (expected one of meeting_pre, afternoon_crash, stuck, before_leave)"))
    }
}

/// Recovery category a routine serves.
///
/// Declaration order is significant: it is the tie-break priority used
/// when two categories score the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryType {
    Cognitive,
    Sensory,
    Movement,
    Emotion,
    Planning,
    Flow,
}

impl RecoveryType {
    pub const ALL: [RecoveryType; 6] = [
        RecoveryType::Cognitive,
        RecoveryType::Sensory,
        RecoveryType::Movement,
        RecoveryType::Emotion,
        RecoveryType::Planning,
        RecoveryType::Flow,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RecoveryType::Cognitive => "cognitive",
            RecoveryType::Sensory => "sensory",
            RecoveryType::Movement => "movement",
            RecoveryType::Emotion => "emotion",
            RecoveryType::Planning => "planning",
            RecoveryType::Flow => "flow",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecoveryType::Cognitive => "Cognitive offload",
            RecoveryType::Sensory => "Sensory shutdown",
            RecoveryType::Movement => "Movement reset",
            RecoveryType::Emotion => "Emotional steadying",
            RecoveryType::Planning => "Planning reset",
            RecoveryType::Flow => "Joy / flow",
        }
    }
}

impl fmt::Display for RecoveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Mid,
}

/// Hard environmental requirements of a routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Can be done somewhere quiet (false for routines that make noise).
    pub quiet_ok: bool,
    /// Can be done somewhere loud.
    pub noise_ok: bool,
    pub alone_required: bool,
    pub walk_required: bool,
    /// Informational only; not used by the filter.
    pub seat_ok: bool,
    pub privacy_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineStep {
    pub text: String,
    pub seconds: u32,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub title: String,
    pub situation: Situation,
    pub duration_min: u32,
    #[serde(rename = "type")]
    pub recovery_type: RecoveryType,
    pub environment: Environment,
    pub effort: Effort,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub forbidden: String,
    pub steps: Vec<RoutineStep>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Routine {
    /// Sum of all step durations. Expected to approximate
    /// `duration_min * 60` but not required to match it.
    pub fn total_seconds(&self) -> u32 {
        self.steps.iter().map(|s| s.seconds).sum()
    }
}
