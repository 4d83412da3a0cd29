//! On-disk format of `templates.json` and its validation.

use std::collections::HashSet;

use serde::Deserialize;

use super::{Template, TemplatesError};

#[derive(Debug, Deserialize)]
pub(crate) struct TemplatesFile {
    pub(super) templates: Vec<TemplateEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TemplateEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// `builtin_names` must be lowercase.
pub(crate) fn validate_and_convert(
    file: TemplatesFile,
    builtin_names: &HashSet<String>,
) -> Result<Vec<Template>, TemplatesError> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(file.templates.len());

    for (i, entry) in file.templates.into_iter().enumerate() {
        let name = entry.name.trim().to_string();
        if name.is_empty() {
            return Err(TemplatesError::Validation(format!(
                "Template at index {}: name cannot be empty",
                i
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TemplatesError::Validation(format!(
                "Template '{}': name must contain only letters, numbers, hyphens, and underscores",
                name
            )));
        }
        let lower = name.to_lowercase();
        if builtin_names.contains(&lower) {
            return Err(TemplatesError::Validation(format!(
                "Template '{}': name conflicts with a built-in template",
                name
            )));
        }
        if !seen.insert(lower) {
            return Err(TemplatesError::Validation(format!(
                "Duplicate template name '{}'",
                name
            )));
        }
        if entry.persona.trim().is_empty() && entry.task.trim().is_empty() {
            return Err(TemplatesError::Validation(format!(
                "Template '{}': persona and task cannot both be empty",
                name
            )));
        }

        result.push(Template {
            description: entry.description.trim().to_string(),
            persona: entry.persona.trim().to_string(),
            task: entry.task.trim().to_string(),
            tags: entry
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            name,
            is_custom: true,
        });
    }

    Ok(result)
}
