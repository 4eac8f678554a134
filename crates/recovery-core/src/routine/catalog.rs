//! The routine catalog.
//!
//! The built-in catalog ships inside the library as JSON. A user catalog in
//! the same format can replace it (see `catalog.path` in the config).
//! The engine assumes a valid catalog; [`Catalog::validate`] is offered for
//! tooling that wants to check a file before using it.

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use super::{Routine, Situation};
use crate::checkin::TimeSlot;
use crate::error::{CatalogError, Result};

const BUILTIN_ROUTINES: &str = include_str!("../../data/routines.json");

/// Ordered, immutable collection of routines.
#[derive(Debug, Clone)]
pub struct Catalog {
    routines: Vec<Routine>,
}

/// A problem found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogIssue {
    EmptyId { index: usize },
    DuplicateId { id: String },
    EmptySteps { id: String },
    ZeroSecondStep { id: String, step_index: usize },
    UnsupportedDuration { id: String, duration_min: u32 },
}

impl Catalog {
    pub fn new(routines: Vec<Routine>) -> Self {
        Self { routines }
    }

    /// The catalog bundled with the library.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_ROUTINES)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let routines: Vec<Routine> =
            serde_json::from_str(json).map_err(|e| CatalogError::ParseFailed(e.to_string()))?;
        Ok(Self { routines })
    }

    /// Load a user catalog from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| CatalogError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if raw.trim().is_empty() {
            return Err(CatalogError::Unreadable {
                path: path.to_path_buf(),
                message: "file is empty".into(),
            }
            .into());
        }
        let catalog = Self::from_json(&raw)?;
        tracing::debug!(path = %path.display(), routines = catalog.len(), "loaded user catalog");
        Ok(catalog)
    }

    /// Built-in catalog unless `path` is set, in which case the file is
    /// loaded instead.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }

    pub fn routines(&self) -> &[Routine] {
        &self.routines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Routine> {
        self.routines.iter()
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Routine> {
        self.routines.iter().find(|r| r.id == id)
    }

    /// Like [`Catalog::get`] but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<&Routine> {
        self.get(id)
            .ok_or_else(|| CatalogError::UnknownRoutine(id.to_string()).into())
    }

    /// Routines for a situation and/or duration, in catalog order.
    pub fn select(&self, situation: Option<Situation>, duration_min: Option<u32>) -> Vec<&Routine> {
        self.routines
            .iter()
            .filter(|r| situation.is_none_or(|s| r.situation == s))
            .filter(|r| duration_min.is_none_or(|d| r.duration_min == d))
            .collect()
    }

    /// Check every record; an empty list means the catalog is usable.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for (index, r) in self.routines.iter().enumerate() {
            if r.id.trim().is_empty() {
                issues.push(CatalogIssue::EmptyId { index });
            } else if !seen.insert(r.id.as_str()) {
                issues.push(CatalogIssue::DuplicateId { id: r.id.clone() });
            }

            if r.steps.is_empty() {
                issues.push(CatalogIssue::EmptySteps { id: r.id.clone() });
            }
            for (step_index, step) in r.steps.iter().enumerate() {
                if step.seconds == 0 {
                    issues.push(CatalogIssue::ZeroSecondStep {
                        id: r.id.clone(),
                        step_index,
                    });
                }
            }

            if TimeSlot::from_minutes(r.duration_min).is_none() {
                issues.push(CatalogIssue::UnsupportedDuration {
                    id: r.id.clone(),
                    duration_min: r.duration_min,
                });
            }
        }

        issues
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Routine;
    type IntoIter = std::slice::Iter<'a, Routine>;

    fn into_iter(self) -> Self::IntoIter {
        self.routines.iter()
    }
}
