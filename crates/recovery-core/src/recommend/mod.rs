//! Recommendation pipeline: constraint filter, then type-based ranking.
//!
//! ```text
//! CheckIn -> score_types -> filter_routines -> rank -> Recommendations
//! ```

mod filter;
mod rank;

pub use filter::{filter_routines, mismatch, Mismatch};
pub use rank::rank;

use serde::Serialize;

use crate::checkin::CheckIn;
use crate::routine::{Catalog, Routine};
use crate::scoring::{score_types, TypeScores};

/// Default size of the recommended slice.
pub const DEFAULT_TOP_N: usize = 3;

/// Output of [`recommend`].
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations<'a> {
    pub scores: TypeScores,
    /// Top slice of `browse`.
    pub recommended: Vec<&'a Routine>,
    /// Every eligible routine, ranked.
    pub browse: Vec<&'a Routine>,
}

impl Recommendations<'_> {
    /// True when the constraints leave nothing to suggest.
    pub fn is_empty(&self) -> bool {
        self.browse.is_empty()
    }
}

/// Score, filter and rank the catalog for a check-in's own situation and
/// time slot.
pub fn recommend<'a>(catalog: &'a Catalog, checkin: &CheckIn, top_n: usize) -> Recommendations<'a> {
    let scores = score_types(checkin);
    let eligible = filter_routines(
        catalog,
        checkin.situation,
        checkin.time_slot.minutes(),
        checkin,
    );
    let browse = rank(&eligible, &scores);
    let recommended = browse.iter().take(top_n).copied().collect();

    tracing::debug!(
        situation = %checkin.situation,
        minutes = checkin.time_slot.minutes(),
        primary = %scores.primary().key,
        eligible = browse.len(),
        "computed recommendations"
    );

    Recommendations {
        scores,
        recommended,
        browse,
    }
}
