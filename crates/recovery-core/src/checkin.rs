//! The situational check-in a user fills in before asking for a routine.
//!
//! Numeric fields are subjective 0-10 scores. Missing or non-numeric values
//! deserialize to the midpoint (5) and any JSON number is clamped into the
//! scale, so one odd score never makes a stored document unreadable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::routine::Situation;

/// Default for any missing 0-10 score.
pub const MIDPOINT: u8 = 5;

/// Upper bound of the 0-10 scales.
pub const SCALE_MAX: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Noise {
    Quiet,
    Normal,
    Loud,
}

impl Noise {
    pub fn key(self) -> &'static str {
        match self {
            Noise::Quiet => "quiet",
            Noise::Normal => "normal",
            Noise::Loud => "loud",
        }
    }
}

impl fmt::Display for Noise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Noise {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quiet" => Ok(Noise::Quiet),
            "normal" => Ok(Noise::Normal),
            "loud" => Ok(Noise::Loud),
            other => Err(format!("unknown noise level '{other}' (expected quiet, normal or loud)")),
        }
    }
}

/// Available time, in minutes. Serialized as the bare minute count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TimeSlot {
    Three,
    Ten,
    /// Pro only.
    Thirty,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Three, TimeSlot::Ten, TimeSlot::Thirty];

    pub fn minutes(self) -> u32 {
        match self {
            TimeSlot::Three => 3,
            TimeSlot::Ten => 10,
            TimeSlot::Thirty => 30,
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        match minutes {
            3 => Some(TimeSlot::Three),
            10 => Some(TimeSlot::Ten),
            30 => Some(TimeSlot::Thirty),
            _ => None,
        }
    }

    pub fn requires_pro(self) -> bool {
        self == TimeSlot::Thirty
    }
}

impl TryFrom<u32> for TimeSlot {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        TimeSlot::from_minutes(value)
            .ok_or_else(|| format!("unsupported time slot {value} (expected 3, 10 or 30)"))
    }
}

impl From<TimeSlot> for u32 {
    fn from(slot: TimeSlot) -> Self {
        slot.minutes()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.minutes())
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let minutes: u32 = s
            .trim_end_matches("min")
            .trim_end_matches('m')
            .parse()
            .map_err(|_| format!("invalid time slot '{s}'"))?;
        TimeSlot::try_from(minutes)
    }
}

fn midpoint() -> u8 {
    MIDPOINT
}

/// Accept any JSON value for a 0-10 score: numbers are rounded and clamped,
/// everything else reads as the midpoint.
pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let score = match value.as_i64() {
        Some(n) => n.clamp(0, SCALE_MAX as i64) as u8,
        None => match value.as_f64() {
            Some(f) if f.is_finite() => f.round().clamp(0.0, SCALE_MAX as f64) as u8,
            Some(_) => SCALE_MAX,
            None => MIDPOINT,
        },
    };
    Ok(score)
}

fn default_situation() -> Situation {
    Situation::AfternoonCrash
}

fn default_time_slot() -> TimeSlot {
    TimeSlot::Three
}

fn default_noise() -> Noise {
    Noise::Normal
}

/// User-reported situation and environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    #[serde(default = "default_situation")]
    pub situation: Situation,
    #[serde(default = "default_time_slot")]
    pub time_slot: TimeSlot,
    #[serde(default = "default_noise")]
    pub noise: Noise,
    #[serde(default = "midpoint", deserialize_with = "lenient_score")]
    pub energy: u8,
    #[serde(default = "midpoint", deserialize_with = "lenient_score")]
    pub tension: u8,
    #[serde(default = "midpoint", deserialize_with = "lenient_score")]
    pub overheat: u8,
    #[serde(default = "midpoint", deserialize_with = "lenient_score")]
    pub urgency: u8,
    #[serde(default)]
    pub alone: bool,
    #[serde(default)]
    pub privacy: bool,
    #[serde(default)]
    pub walkable: bool,
}

impl Default for CheckIn {
    fn default() -> Self {
        Self {
            situation: default_situation(),
            time_slot: default_time_slot(),
            noise: default_noise(),
            energy: MIDPOINT,
            tension: MIDPOINT,
            overheat: MIDPOINT,
            urgency: MIDPOINT,
            alone: false,
            privacy: false,
            walkable: false,
        }
    }
}

impl CheckIn {
    /// Copy with every score clamped into 0..=10.
    pub fn clamped(&self) -> Self {
        Self {
            energy: self.energy.min(SCALE_MAX),
            tension: self.tension.min(SCALE_MAX),
            overheat: self.overheat.min(SCALE_MAX),
            urgency: self.urgency.min(SCALE_MAX),
            ..*self
        }
    }

    pub fn stamped(&self, ts: DateTime<Utc>) -> LastCheckin {
        LastCheckin { checkin: *self, ts }
    }
}

/// The most recent check-in, with the time it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastCheckin {
    #[serde(flatten)]
    pub checkin: CheckIn,
    pub ts: DateTime<Utc>,
}
