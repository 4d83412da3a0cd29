//! Prompt templates: built-in presets plus user presets from `templates.json`.
//!
//! Built-ins are embedded from `config/builtin-templates.json` (checked by the
//! build script). User presets are validated on load; a bad file is reported and
//! the built-ins are used alone.

mod form;
mod validation;

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::core::paths;
use crate::core::util::filter_by_query;

pub use form::TemplateForm;

/// A named preset. Never mutated after load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub description: String,
    pub persona: String,
    pub task: String,
    pub tags: Vec<String>,
    pub is_custom: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplatesError {
    #[error("Failed to read templates file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl TemplatesError {
    /// Shown when user templates are skipped and only built-ins remain.
    pub fn fallback_message(&self) -> String {
        let detail = match self {
            TemplatesError::Io(_) => "could not read file".to_string(),
            TemplatesError::Json(_) => "invalid JSON".to_string(),
            TemplatesError::Validation(msg) => format!("validation error: {}", msg),
        };
        format!("templates.json: {}; using built-in templates only", detail)
    }
}

#[derive(Debug, Deserialize)]
struct BuiltinEntry {
    name: String,
    description: String,
    persona: String,
    task: String,
    #[serde(default)]
    tags: Vec<String>,
}

fn load_builtin_templates() -> Vec<Template> {
    let json = include_str!("../../../config/builtin-templates.json");
    let entries: Vec<BuiltinEntry> =
        serde_json::from_str(json).expect("builtin-templates.json is checked by build.rs");
    entries
        .into_iter()
        .map(|e| Template {
            name: e.name,
            description: e.description,
            persona: e.persona,
            task: e.task,
            tags: e.tags,
            is_custom: false,
        })
        .collect()
}

static BUILTIN_TEMPLATES: OnceLock<Vec<Template>> = OnceLock::new();

pub fn builtin_templates() -> &'static [Template] {
    BUILTIN_TEMPLATES.get_or_init(load_builtin_templates)
}

/// Load user templates from the config directory. Absent file means none.
pub fn load_templates() -> Result<Vec<Template>, TemplatesError> {
    match paths::templates_path() {
        Some(path) => load_templates_from(&path),
        None => Ok(vec![]),
    }
}

pub fn load_templates_from(path: &Path) -> Result<Vec<Template>, TemplatesError> {
    if !path.exists() {
        return Ok(vec![]);
    }
    let content = fs::read_to_string(path)?;
    let file: validation::TemplatesFile = serde_json::from_str(&content)?;
    let builtin: HashSet<String> = builtin_templates()
        .iter()
        .map(|t| t.name.to_lowercase())
        .collect();
    let templates = validation::validate_and_convert(file, &builtin)?;
    log::info!("loaded {} user templates from {}", templates.len(), path.display());
    Ok(templates)
}

/// Built-ins (sorted) followed by user templates (sorted).
#[derive(Clone, Debug)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    pub fn new(custom: Vec<Template>) -> Self {
        let mut builtin = builtin_templates().to_vec();
        builtin.sort_by_key(|t| t.name.to_lowercase());
        let mut custom = custom;
        custom.sort_by_key(|t| t.name.to_lowercase());
        builtin.append(&mut custom);
        Self { templates: builtin }
    }

    /// Catalog with user templates, or built-ins only plus a warning if the file is bad.
    pub fn load() -> (Self, Option<String>) {
        match load_templates() {
            Ok(custom) => (Self::new(custom), None),
            Err(e) => {
                let msg = e.fallback_message();
                log::warn!("{}", msg);
                (Self::new(vec![]), Some(msg))
            }
        }
    }

    pub fn all(&self) -> &[Template] {
        &self.templates
    }

    pub fn find(&self, name: &str) -> Option<&Template> {
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Match on name or description, case-insensitive.
    pub fn filter(&self, query: &str) -> Vec<&Template> {
        filter_by_query(&self.templates, query, |t| {
            (t.name.as_str(), t.description.as_str())
        })
    }
}
