//! Editable fields pre-filled from a selected template.

use crate::core::prompt::{GenerationRequest, LanguageSpec, OutputFormat};

use super::Template;

/// A field value plus whether the user typed it. Overrides survive template switches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Field<T> {
    value: T,
    overridden: bool,
}

impl<T: Clone> Field<T> {
    fn prefill(&mut self, default: &T) {
        if !self.overridden {
            self.value = default.clone();
        }
    }

    fn set(&mut self, value: T) {
        self.value = value;
        self.overridden = true;
    }
}

#[derive(Clone, Debug, Default)]
pub struct TemplateForm {
    selected: Option<String>,
    persona: Field<String>,
    task: Field<String>,
    tags: Field<Vec<String>>,
    pub context: String,
    pub tone: String,
    pub output_format: Option<OutputFormat>,
    pub language: Option<LanguageSpec>,
}

impl TemplateForm {
    /// Fill persona, task and tags from `template`, keeping any user override.
    pub fn select(&mut self, template: &Template) {
        log::debug!("template selected: {}", template.name);
        self.selected = Some(template.name.clone());
        self.persona.prefill(&template.persona);
        self.task.prefill(&template.task);
        self.tags.prefill(&template.tags);
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn persona(&self) -> &str {
        &self.persona.value
    }

    pub fn task(&self) -> &str {
        &self.task.value
    }

    pub fn tags(&self) -> &[String] {
        &self.tags.value
    }

    pub fn set_persona(&mut self, persona: impl Into<String>) {
        self.persona.set(persona.into());
    }

    pub fn set_task(&mut self, task: impl Into<String>) {
        self.task.set(task.into());
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags.set(tags);
    }

    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            persona: self.persona().to_string(),
            task: self.task().to_string(),
            context: self.context.clone(),
            tags: self.tags().to_vec(),
            tone: self.tone.clone(),
            output_format: self.output_format,
            language: self.language.clone(),
        }
    }
}
