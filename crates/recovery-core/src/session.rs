//! Completed-routine records and the recorder that appends them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::checkin::{lenient_score, CheckIn, LastCheckin, SCALE_MAX};
use crate::error::{Result, ValidationError};
use crate::player::CompletedRun;
use crate::routine::{RecoveryType, Situation};

/// Default history cap.
pub const DEFAULT_HISTORY_CAP: usize = 2000;

/// What the user felt helped most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpfulTag {
    #[default]
    Breathing,
    Movement,
    Organizing,
    Blocking,
    Other,
}

impl HelpfulTag {
    pub const ALL: [HelpfulTag; 5] = [
        HelpfulTag::Breathing,
        HelpfulTag::Movement,
        HelpfulTag::Organizing,
        HelpfulTag::Blocking,
        HelpfulTag::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            HelpfulTag::Breathing => "breathing",
            HelpfulTag::Movement => "movement",
            HelpfulTag::Organizing => "organizing",
            HelpfulTag::Blocking => "blocking",
            HelpfulTag::Other => "other",
        }
    }
}

impl fmt::Display for HelpfulTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for HelpfulTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HelpfulTag::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| format!("unknown helpful tag '{s}'"))
    }
}

/// One completed routine with its before/after rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub ts: DateTime<Utc>,
    pub routine_id: String,
    #[serde(default)]
    pub routine_title: String,
    pub situation: Situation,
    #[serde(rename = "duration_min")]
    pub duration_min: u32,
    #[serde(rename = "type")]
    pub recovery_type: RecoveryType,
    pub checkin: CheckIn,
    #[serde(deserialize_with = "lenient_score")]
    pub before: u8,
    #[serde(deserialize_with = "lenient_score")]
    pub after: u8,
    /// `after - before`, may be negative.
    pub delta: i8,
    #[serde(default)]
    pub helpful_tag: HelpfulTag,
}

/// The user's rating of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    pub before: i64,
    pub after: i64,
    pub helpful_tag: HelpfulTag,
}

impl Rating {
    pub fn new(before: i64, after: i64) -> Self {
        Self {
            before,
            after,
            helpful_tag: HelpfulTag::default(),
        }
    }

    pub fn with_tag(self, helpful_tag: HelpfulTag) -> Self {
        Self { helpful_tag, ..self }
    }
}

/// Check a 0-10 rating, returning it narrowed.
pub fn validate_rating(field: &str, value: i64) -> Result<u8> {
    if (0..=SCALE_MAX as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ValidationError::RatingOutOfRange {
            field: field.to_string(),
            value,
        }
        .into())
    }
}

/// Build the session for a completed run. Fails only on ratings outside
/// the 0-10 scale.
pub fn build_session(
    run: &CompletedRun,
    checkin: &CheckIn,
    rating: Rating,
    now: DateTime<Utc>,
) -> Result<Session> {
    let before = validate_rating("before", rating.before)?;
    let after = validate_rating("after", rating.after)?;
    let routine = run.routine();

    Ok(Session {
        id: format!("S_{}", now.timestamp_millis()),
        ts: now,
        routine_id: routine.id.clone(),
        routine_title: routine.title.clone(),
        situation: checkin.situation,
        duration_min: routine.duration_min,
        recovery_type: routine.recovery_type,
        checkin: *checkin,
        before,
        after,
        delta: after as i8 - before as i8,
        helpful_tag: rating.helpful_tag,
    })
}

/// Prepend `session` to a newest-first history and drop the oldest past `cap`.
pub fn push_capped(sessions: &mut Vec<Session>, session: Session, cap: usize) {
    sessions.insert(0, session);
    sessions.truncate(cap);
}

/// Record a completed run: validate the rating, prepend the session, cap
/// the history and refresh the last check-in.
pub fn record_completion(
    sessions: &mut Vec<Session>,
    last_checkin: &mut Option<LastCheckin>,
    run: &CompletedRun,
    checkin: &CheckIn,
    rating: Rating,
    now: DateTime<Utc>,
    cap: usize,
) -> Result<Session> {
    let session = build_session(run, checkin, rating, now)?;
    push_capped(sessions, session.clone(), cap);
    *last_checkin = Some(checkin.stamped(now));

    tracing::info!(
        session_id = %session.id,
        routine_id = %session.routine_id,
        delta = session.delta,
        "session recorded"
    );
    Ok(session)
}
