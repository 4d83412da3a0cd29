//! Configuration from the environment (and `.env`), plus the stored API key.
//!
//! The credential is required: there is no built-in default key.

use std::env;
use std::fmt;
use std::time::Duration;

use async_openai::config::OpenAIConfig;

use crate::core::api_key;
use crate::core::models::ResolvePolicy;

/// Native Gemini REST base (model listing).
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// OpenAI-compatible base used for chat completions.
pub const DEFAULT_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
/// Model used when resolution degrades.
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 1.0;
pub const MAX_TEMPERATURE: f32 = 2.0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Where the API key came from (shown by `config`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env(&'static str),
    File,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Env(var) => write!(f, "from {}", var),
            KeySource::File => write!(f, "from key file"),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub openai_config: OpenAIConfig,
    api_key: String,
    pub key_source: KeySource,
    pub api_base: String,
    pub openai_base: String,
    /// Explicit model; when set, resolution is skipped.
    pub model_id: Option<String>,
    pub fallback_model: String,
    pub temperature: f32,
    pub system_instruction: Option<String>,
    pub resolve_policy: ResolvePolicy,
    pub request_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("key_source", &self.key_source)
            .field("api_base", &self.api_base)
            .field("openai_base", &self.openai_base)
            .field("model_id", &self.model_id)
            .field("fallback_model", &self.fallback_model)
            .field("temperature", &self.temperature)
            .field("resolve_policy", &self.resolve_policy)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Same config with a different explicit model (e.g. `-m` on the command line).
    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(m) = model.filter(|m| !m.trim().is_empty()) {
            self.model_id = Some(m.trim().to_string());
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "GEMINI_API_KEY is not set. Export GEMINI_API_KEY (or GOOGLE_API_KEY), or run `config set-api-key`."
    )]
    MissingApiKey,
    #[error("{var} must be a number, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("GEMINI_RESOLVE must be 'list' or 'probe', got '{0}'")]
    InvalidPolicy(String),
}

/// Load configuration from the process environment and the stored key file.
pub fn load() -> Result<Config, ConfigError> {
    load_from(|name| env::var(name).ok(), api_key::load_api_key)
}

/// Load configuration from an arbitrary variable lookup. `stored_key` is only
/// consulted when no key variable is set.
pub(crate) fn load_from<F, K>(lookup: F, stored_key: K) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    K: FnOnce() -> Option<String>,
{
    let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let (api_key, key_source) = match API_KEY_VARS
        .iter()
        .find_map(|name| var(*name).map(|v| (v, KeySource::Env(*name))))
    {
        Some(found) => found,
        None => (stored_key().ok_or(ConfigError::MissingApiKey)?, KeySource::File),
    };

    let api_base = var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let openai_base =
        var("GEMINI_OPENAI_BASE").unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string());
    let fallback_model =
        var("GEMINI_FALLBACK_MODEL").unwrap_or_else(|| DEFAULT_FALLBACK_MODEL.to_string());

    let temperature = match var("GEMINI_TEMPERATURE") {
        Some(raw) => {
            let t: f32 = raw.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "GEMINI_TEMPERATURE",
                value: raw.clone(),
            })?;
            clamp_temperature(t)
        }
        None => DEFAULT_TEMPERATURE,
    };

    let timeout_secs = match var("GEMINI_TIMEOUT_SECS") {
        Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
            var: "GEMINI_TIMEOUT_SECS",
            value: raw.clone(),
        })?,
        None => DEFAULT_TIMEOUT_SECS,
    };

    let resolve_policy = match var("GEMINI_RESOLVE") {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPolicy(raw))?,
        None => ResolvePolicy::default(),
    };

    let openai_config = OpenAIConfig::new()
        .with_api_base(openai_base.clone())
        .with_api_key(api_key.clone());

    Ok(Config {
        openai_config,
        api_key,
        key_source,
        api_base,
        openai_base,
        model_id: var("GEMINI_MODEL"),
        fallback_model,
        temperature,
        system_instruction: var("GEMINI_SYSTEM_INSTRUCTION"),
        resolve_policy,
        request_timeout: Duration::from_secs(timeout_secs.max(1)),
    })
}

/// Clamp a temperature to the accepted [0, 2] range, logging when it changes.
pub fn clamp_temperature(t: f32) -> f32 {
    if t.is_nan() {
        log::warn!("temperature is NaN, using {}", DEFAULT_TEMPERATURE);
        return DEFAULT_TEMPERATURE;
    }
    let clamped = t.clamp(0.0, MAX_TEMPERATURE);
    if clamped != t {
        log::warn!("temperature {} out of range, clamped to {}", t, clamped);
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = load_from(lookup(&[]), || None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn blank_env_key_falls_through_to_file() {
        let config = load_from(lookup(&[("GEMINI_API_KEY", "  ")]), || {
            Some("file-key".to_string())
        })
        .unwrap();
        assert_eq!(config.api_key(), "file-key");
        assert_eq!(config.key_source, KeySource::File);
    }

    #[test]
    fn gemini_key_wins_over_google_key() {
        let config = load_from(
            lookup(&[("GOOGLE_API_KEY", "g"), ("GEMINI_API_KEY", "m")]),
            || None,
        )
        .unwrap();
        assert_eq!(config.api_key(), "m");
        assert_eq!(config.key_source, KeySource::Env("GEMINI_API_KEY"));
    }

    #[test]
    fn defaults_apply() {
        let config = load_from(lookup(&[("GOOGLE_API_KEY", "k")]), || None).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.openai_base, DEFAULT_OPENAI_BASE);
        assert_eq!(config.fallback_model, DEFAULT_FALLBACK_MODEL);
        assert_eq!(config.model_id, None);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.resolve_policy, ResolvePolicy::List);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn temperature_is_clamped() {
        let config = load_from(
            lookup(&[("GEMINI_API_KEY", "k"), ("GEMINI_TEMPERATURE", "3.5")]),
            || None,
        )
        .unwrap();
        assert_eq!(config.temperature, MAX_TEMPERATURE);
    }

    #[test]
    fn invalid_temperature_is_reported() {
        let err = load_from(
            lookup(&[("GEMINI_API_KEY", "k"), ("GEMINI_TEMPERATURE", "hot")]),
            || None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("GEMINI_TEMPERATURE"));
    }

    #[test]
    fn probe_policy_from_env() {
        let config = load_from(
            lookup(&[("GEMINI_API_KEY", "k"), ("GEMINI_RESOLVE", "Probe")]),
            || None,
        )
        .unwrap();
        assert_eq!(config.resolve_policy, ResolvePolicy::Probe);
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = load_from(lookup(&[("GEMINI_API_KEY", "secret-123")]), || None).unwrap();
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("secret-123"));
    }

    #[test]
    fn with_model_ignores_blank_override() {
        let config = load_from(
            lookup(&[("GEMINI_API_KEY", "k"), ("GEMINI_MODEL", "gemini-1.5-pro")]),
            || None,
        )
        .unwrap()
        .with_model(Some(" ".to_string()));
        assert_eq!(config.model_id.as_deref(), Some("gemini-1.5-pro"));
    }
}
