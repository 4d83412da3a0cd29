//! Probe policy: try a fixed, hand-maintained list of candidates with a minimal call.

use std::future::Future;

use super::error::ResolveError;

/// Candidates tried in order when the probe policy is used.
pub const PROBE_CANDIDATES: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-1.5-flash",
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro",
    "gemini-pro",
];

/// A single "is this model callable right now" check.
pub trait Probe {
    fn probe(&self, model: &str) -> impl Future<Output = Result<(), ResolveError>> + Send;
}

/// Ordered candidate table, decoupled from the probing capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeTable {
    candidates: Vec<String>,
}

impl Default for ProbeTable {
    fn default() -> Self {
        Self::new(PROBE_CANDIDATES.iter().copied())
    }
}

impl ProbeTable {
    pub fn new(candidates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Probe each candidate in order and return the first that answers.
    /// When every candidate fails, the last observed error is carried in the result.
    pub async fn first_live<P: Probe + Sync>(&self, prober: &P) -> Result<String, ResolveError> {
        let mut last_error: Option<ResolveError> = None;
        for candidate in &self.candidates {
            match prober.probe(candidate).await {
                Ok(()) => {
                    log::info!("probe succeeded for {}", candidate);
                    return Ok(candidate.clone());
                }
                Err(e) => {
                    log::debug!("probe failed for {}: {}", candidate, e);
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => Err(ResolveError::AllCandidatesFailed {
                tried: self.candidates.len(),
                last_error: e.to_string(),
            }),
            None => Err(ResolveError::NoEligibleModels),
        }
    }
}
