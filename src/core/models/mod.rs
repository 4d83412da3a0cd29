//! Model discovery, ranking, probing and resolution.

mod error;
mod fetch;
mod info;
mod priority;
mod probe;
mod resolver;

pub use error::ResolveError;
pub use fetch::{GeminiModelLister, ModelLister, filter_models};
pub use info::{GENERATE_CONTENT, ModelInfo};
pub use priority::{Tier, rank_candidates, tier_of};
pub use probe::{Probe, ProbeTable};
pub use resolver::{FailureMode, ModelResolver, Resolution, ResolvePolicy, resolve_for_config};
