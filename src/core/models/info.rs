//! Model descriptor returned by the listing endpoint.

use serde::{Deserialize, Serialize};

/// Capability a model must advertise to be a generation candidate.
pub const GENERATE_CONTENT: &str = "generateContent";

/// Lightweight model info for display and selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Identifier without the `models/` prefix, e.g. `gemini-1.5-flash`.
    pub id: String,
    pub display_name: String,
    pub supported_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generation(&self) -> bool {
        self.supported_methods.iter().any(|m| m == GENERATE_CONTENT)
    }
}

/// Strip the `models/` resource prefix the native API puts on names.
pub fn normalize_model_id(name: &str) -> &str {
    name.strip_prefix("models/").unwrap_or(name)
}
