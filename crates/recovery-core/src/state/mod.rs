//! Process-wide persisted state and the reducer that mutates it.

mod reducer;

pub use reducer::{reduce, Action, AppStore, Outcome, ReduceContext};

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::checkin::LastCheckin;
use crate::error::Result;
use crate::quota::FreeDaily;
use crate::session::Session;

/// Free-text profile the user may fill in during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub work_style: String,
}

/// Everything that survives a restart. Every field defaults so partial or
/// older documents still load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub consented: bool,
    #[serde(default)]
    pub is_pro: bool,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub free_daily: FreeDaily,
    #[serde(default)]
    pub last_checkin: Option<LastCheckin>,
    /// Newest first.
    #[serde(default)]
    pub sessions: Vec<Session>,
}

/// A state document read field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salvaged {
    pub state: AppState,
    /// Top-level keys that fell back to their default, plus `sessions[i]`
    /// for each dropped history entry.
    pub discarded: Vec<String>,
}

impl AppState {
    /// The full state as a pretty JSON document.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a persisted document one field at a time. A field that does
    /// not parse falls back to its default on its own, and a bad history
    /// entry drops only that entry. Fails only when `content` is not a JSON
    /// object.
    pub fn salvage_json(content: &str) -> Result<Salvaged> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Object(mut map) = value else {
            return Err(serde_json::Error::custom("state document is not a JSON object").into());
        };

        let mut discarded = Vec::new();
        let state = AppState {
            consented: take_field(&mut map, "consented", &mut discarded),
            is_pro: take_field(&mut map, "isPro", &mut discarded),
            profile: take_field(&mut map, "profile", &mut discarded),
            free_daily: take_field(&mut map, "freeDaily", &mut discarded),
            last_checkin: take_field(&mut map, "lastCheckin", &mut discarded),
            sessions: take_sessions(&mut map, &mut discarded),
        };
        Ok(Salvaged { state, discarded })
    }
}

fn take_field<T: DeserializeOwned + Default>(
    map: &mut Map<String, Value>,
    key: &str,
    discarded: &mut Vec<String>,
) -> T {
    match map.remove(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(field = key, error = %e, "unreadable state field reset to default");
            discarded.push(key.to_string());
            T::default()
        }),
    }
}

fn take_sessions(map: &mut Map<String, Value>, discarded: &mut Vec<String>) -> Vec<Session> {
    let entries = match map.remove("sessions") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            tracing::warn!("session history is not a list, starting empty");
            discarded.push("sessions".into());
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(index = i, error = %e, "dropping unreadable session");
                discarded.push(format!("sessions[{i}]"));
                None
            }
        })
        .collect()
}
