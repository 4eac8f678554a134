//! Hard environmental constraints.

use crate::checkin::{CheckIn, Noise};
use crate::routine::{Routine, Situation};

/// Why a routine is ruled out for a check-in, if it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    Situation,
    Duration,
    NeedsWalk,
    NeedsAlone,
    NeedsPrivacy,
    NotQuietSafe,
    NotNoiseSafe,
}

/// First constraint that excludes `routine`, or `None` if it is eligible.
pub fn mismatch(
    routine: &Routine,
    situation: Situation,
    duration_min: u32,
    checkin: &CheckIn,
) -> Option<Mismatch> {
    let env = &routine.environment;
    if routine.situation != situation {
        Some(Mismatch::Situation)
    } else if routine.duration_min != duration_min {
        Some(Mismatch::Duration)
    } else if env.walk_required && !checkin.walkable {
        Some(Mismatch::NeedsWalk)
    } else if env.alone_required && !checkin.alone {
        Some(Mismatch::NeedsAlone)
    } else if env.privacy_required && !checkin.privacy {
        Some(Mismatch::NeedsPrivacy)
    } else if !env.quiet_ok && checkin.noise == Noise::Quiet {
        Some(Mismatch::NotQuietSafe)
    } else if !env.noise_ok && checkin.noise == Noise::Loud {
        Some(Mismatch::NotNoiseSafe)
    } else {
        None
    }
}

/// Routines that fit the situation, duration and environment, in the
/// order given. An empty result means "no eligible routine".
pub fn filter_routines<'a, I>(
    routines: I,
    situation: Situation,
    duration_min: u32,
    checkin: &CheckIn,
) -> Vec<&'a Routine>
where
    I: IntoIterator<Item = &'a Routine>,
{
    routines
        .into_iter()
        .filter(|r| mismatch(r, situation, duration_min, checkin).is_none())
        .collect()
}
