//! Splitting a completed dual-language response on the sentinel marker.

use crate::core::prompt::DUAL_SENTINEL;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DualOutput {
    /// Source-language variant, then target-language variant.
    Split { first: String, second: String },
    /// Sentinel missing (or one side empty): the whole text as one block.
    Single(String),
}

impl DualOutput {
    pub fn segments(&self) -> Vec<&str> {
        match self {
            DualOutput::Split { first, second } => vec![first.as_str(), second.as_str()],
            DualOutput::Single(text) => vec![text.as_str()],
        }
    }
}

/// Split a completed response. Never fails: a missing sentinel yields a single segment.
/// With several sentinels the split happens at the first one.
pub fn split_dual(text: &str) -> DualOutput {
    let Some((head, tail)) = text.split_once(DUAL_SENTINEL) else {
        log::debug!("dual-language sentinel absent; rendering as one block");
        return DualOutput::Single(text.trim().to_string());
    };
    let first = head.trim();
    let second = tail.replace(DUAL_SENTINEL, "");
    let second = second.trim();
    if first.is_empty() || second.is_empty() {
        log::warn!("dual-language response has an empty side; rendering as one block");
        return DualOutput::Single(text.replace(DUAL_SENTINEL, "").trim().to_string());
    }
    DualOutput::Split {
        first: first.to_string(),
        second: second.to_string(),
    }
}
