//! Model resolution errors.

/// Why no model could be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The provider rejected the credential. Fatal: ask for a new key.
    #[error("API key rejected by the provider: {0}")]
    InvalidCredential(String),
    #[error("Could not reach the model service: {0}")]
    Transport(String),
    #[error("No model supporting content generation is available for this API key")]
    NoEligibleModels,
    #[error("Model {model} did not answer the probe: {message}")]
    ProbeFailed { model: String, message: String },
    #[error("None of the {tried} candidate models answered; last error: {last_error}")]
    AllCandidatesFailed { tried: usize, last_error: String },
}

impl ResolveError {
    /// Errors that must stop the session instead of degrading to the fallback model.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ResolveError::InvalidCredential(_) | ResolveError::AllCandidatesFailed { .. }
        )
    }
}
