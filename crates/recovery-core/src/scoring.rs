//! Recovery-type scoring.
//!
//! Maps a check-in onto a 0-100 score per recovery category using a small,
//! auditable set of linear formulas. Categories are then ranked; ties keep
//! the fixed category order (cognitive, sensory, movement, emotion,
//! planning, flow).

use serde::{Deserialize, Serialize};

use crate::checkin::{CheckIn, Noise};
use crate::routine::RecoveryType;

/// One category's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeScore {
    pub key: RecoveryType,
    pub score: u8,
}

impl TypeScore {
    pub fn label(&self) -> &'static str {
        self.key.label()
    }
}

/// Scores for all six categories plus their ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeScores {
    /// In category order.
    pub scores: [TypeScore; 6],
    /// Non-increasing by score.
    pub sorted: Vec<TypeScore>,
}

impl TypeScores {
    pub fn primary(&self) -> TypeScore {
        self.sorted[0]
    }

    pub fn secondary(&self) -> TypeScore {
        self.sorted[1]
    }

    pub fn score_of(&self, key: RecoveryType) -> u8 {
        self.scores
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.score)
            .unwrap_or(0)
    }
}

fn clamp_score(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

fn noise_score(noise: Noise) -> i32 {
    match noise {
        Noise::Loud => 8,
        Noise::Normal => 5,
        Noise::Quiet => 2,
    }
}

/// Raw (clamped) score for one category.
pub fn score_type(key: RecoveryType, checkin: &CheckIn) -> u8 {
    let c = checkin.clamped();
    let energy = c.energy as i32;
    let tension = c.tension as i32;
    let overheat = c.overheat as i32;
    let urgency = c.urgency as i32;

    let raw = match key {
        RecoveryType::Cognitive => overheat * 10 + urgency * 3,
        RecoveryType::Movement => tension * 10 + if energy < 4 { 10 } else { 0 },
        RecoveryType::Sensory => noise_score(c.noise) * 10 + if overheat > 6 { 10 } else { 0 },
        RecoveryType::Emotion => (tension + overheat + urgency) * 4,
        RecoveryType::Planning => (10 - energy) * 8 + urgency * 2,
        RecoveryType::Flow => (if energy > 6 { 60 } else { 30 }) - if overheat > 7 { 10 } else { 0 },
    };
    clamp_score(raw)
}

/// Score every category and rank them.
pub fn score_types(checkin: &CheckIn) -> TypeScores {
    let scores = RecoveryType::ALL.map(|key| TypeScore {
        key,
        score: score_type(key, checkin),
    });

    let mut sorted = scores.to_vec();
    // Stable sort keeps category order among equal scores.
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    TypeScores { scores, sorted }
}
