//! Priority tiers for candidate ordering.
//!
//! The table is plain data: edit it to change ordering without touching the resolver.

use std::fmt;

use super::info::ModelInfo;

/// Lower sorts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Low-latency, cheaper models.
    Fast,
    /// General-purpose models.
    General,
    Other,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Fast => write!(f, "fast"),
            Tier::General => write!(f, "general"),
            Tier::Other => write!(f, "other"),
        }
    }
}

/// Substring patterns checked in order; first match wins.
pub const TIER_TABLE: &[(&str, Tier)] = &[
    ("flash-lite", Tier::Fast),
    ("flash", Tier::Fast),
    ("pro", Tier::General),
];

pub fn tier_of(model_id: &str) -> Tier {
    let id = model_id.to_ascii_lowercase();
    TIER_TABLE
        .iter()
        .find(|(pattern, _)| id.contains(pattern))
        .map(|(_, tier)| *tier)
        .unwrap_or(Tier::Other)
}

/// Keep generation-capable models and order them by tier.
/// The sort is stable, so ties keep the provider's order.
pub fn rank_candidates(models: &[ModelInfo]) -> Vec<String> {
    let mut eligible: Vec<&ModelInfo> = models.iter().filter(|m| m.supports_generation()).collect();
    eligible.sort_by_key(|m| tier_of(&m.id));
    let mut ids: Vec<String> = Vec::with_capacity(eligible.len());
    for m in eligible {
        if !ids.contains(&m.id) {
            ids.push(m.id.clone());
        }
    }
    ids
}
