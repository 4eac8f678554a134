//! Ordering of eligible routines by recovery type.

use std::collections::HashSet;

use crate::routine::Routine;
use crate::scoring::TypeScores;

/// Order eligible routines: primary type first, then secondary type, then
/// everything else, each group in input order. Each id appears once (first
/// occurrence wins).
pub fn rank<'a>(eligible: &[&'a Routine], scores: &TypeScores) -> Vec<&'a Routine> {
    let primary = scores.primary().key;
    let secondary = scores.secondary().key;

    let first = eligible.iter().filter(|r| r.recovery_type == primary);
    let second = eligible
        .iter()
        .filter(|r| r.recovery_type == secondary && r.recovery_type != primary);
    let rest = eligible
        .iter()
        .filter(|r| r.recovery_type != primary && r.recovery_type != secondary);

    let mut seen = HashSet::new();
    first
        .chain(second)
        .chain(rest)
        .copied()
        .filter(|&r| seen.insert(r.id.as_str()))
        .collect()
}
