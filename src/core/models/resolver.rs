//! Model resolution: pick the model to use for a credential.

use std::fmt;
use std::str::FromStr;

use crate::core::config::Config;

use super::error::ResolveError;
use super::fetch::{GeminiModelLister, ModelLister};
use super::priority;
use super::probe::{Probe, ProbeTable};

/// How candidates are discovered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolvePolicy {
    /// Ask the provider for its model list and rank it.
    #[default]
    List,
    /// Ping a fixed candidate table in order.
    Probe,
}

impl FromStr for ResolvePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(ResolvePolicy::List),
            "probe" => Ok(ResolvePolicy::Probe),
            other => Err(format!("unknown resolve policy '{}'", other)),
        }
    }
}

impl fmt::Display for ResolvePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvePolicy::List => write!(f, "list"),
            ResolvePolicy::Probe => write!(f, "probe"),
        }
    }
}

/// What to do when resolution fails with a non-fatal error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureMode {
    /// Use the fallback model and attach a warning.
    Degrade,
    /// Report every failure.
    Fatal,
}

/// A selected model plus the ordered candidates it was chosen from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub model: String,
    pub candidates: Vec<String>,
    /// Set when the resolver fell back instead of finding a live model.
    pub warning: Option<String>,
}

impl Resolution {
    /// A model chosen by the user; no discovery involved.
    pub fn explicit(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            candidates: vec![model.clone()],
            model,
            warning: None,
        }
    }

    /// Same candidates with `model` picked instead. `None` if it is not one of them.
    pub fn choose(&self, model: &str) -> Option<Self> {
        let model = self.candidates.iter().find(|c| c.as_str() == model)?;
        Some(Self {
            model: model.clone(),
            candidates: self.candidates.clone(),
            warning: None,
        })
    }
}

pub struct ModelResolver<'a, L, P> {
    lister: &'a L,
    prober: &'a P,
    policy: ResolvePolicy,
    fallback: String,
    table: ProbeTable,
}

impl<'a, L, P> ModelResolver<'a, L, P>
where
    L: ModelLister + Sync,
    P: Probe + Sync,
{
    pub fn new(lister: &'a L, prober: &'a P, policy: ResolvePolicy, fallback: impl Into<String>) -> Self {
        Self {
            lister,
            prober,
            policy,
            fallback: fallback.into(),
            table: ProbeTable::default(),
        }
    }

    pub fn with_probe_table(mut self, table: ProbeTable) -> Self {
        self.table = table;
        self
    }

    /// Ordered, generation-capable candidates from the provider listing.
    pub async fn candidates(&self) -> Result<Vec<String>, ResolveError> {
        let models = self.lister.list_models().await?;
        log::debug!("provider listed {} models", models.len());
        let ranked = priority::rank_candidates(&models);
        if ranked.is_empty() {
            return Err(ResolveError::NoEligibleModels);
        }
        Ok(ranked)
    }

    async fn resolve_strict(&self) -> Result<Resolution, ResolveError> {
        match self.policy {
            ResolvePolicy::List => {
                let candidates = self.candidates().await?;
                Ok(Resolution {
                    model: candidates[0].clone(),
                    candidates,
                    warning: None,
                })
            }
            ResolvePolicy::Probe => {
                let model = self.table.first_live(self.prober).await?;
                Ok(Resolution {
                    model,
                    candidates: self.table.candidates().to_vec(),
                    warning: None,
                })
            }
        }
    }

    /// Resolve a model. With [`FailureMode::Degrade`], non-fatal errors yield the
    /// fallback model plus a warning; credential errors and exhausted probes are
    /// always returned.
    pub async fn resolve(&self, mode: FailureMode) -> Result<Resolution, ResolveError> {
        match self.resolve_strict().await {
            Ok(resolution) => {
                log::info!("resolved model {} ({} policy)", resolution.model, self.policy);
                Ok(resolution)
            }
            Err(e) if mode == FailureMode::Degrade && !e.is_fatal() && !self.fallback.is_empty() => {
                log::warn!("model resolution failed ({}); falling back to {}", e, self.fallback);
                Ok(Resolution {
                    model: self.fallback.clone(),
                    candidates: vec![self.fallback.clone()],
                    warning: Some(format!("{}. Using fallback model {}.", e, self.fallback)),
                })
            }
            Err(e) => {
                log::error!("model resolution failed: {}", e);
                Err(e)
            }
        }
    }
}

/// Resolve the model for `config`: the explicit model when one is set, otherwise
/// discovery under the configured policy.
pub async fn resolve_for_config<P>(
    config: &Config,
    prober: &P,
    mode: FailureMode,
) -> Result<Resolution, ResolveError>
where
    P: Probe + Sync,
{
    if let Some(model) = &config.model_id {
        log::info!("using configured model {}", model);
        return Ok(Resolution::explicit(model.clone()));
    }
    let lister = GeminiModelLister::new(config)?;
    ModelResolver::new(&lister, prober, config.resolve_policy, config.fallback_model.clone())
        .resolve(mode)
        .await
}
