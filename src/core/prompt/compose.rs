//! Rendering a [`GenerationRequest`] into one instruction string, and reading it back.
//!
//! Layout: a preamble line, then `## <Label>` sections in fixed order. Empty
//! sections are left out. Body lines that would read as a heading (or start with
//! the escape character) are prefixed with `\`.

use std::collections::HashSet;

use super::request::{DEFAULT_TASK, GenerationRequest, LanguageMode};

pub const LABEL_ROLE: &str = "Role";
pub const LABEL_TASK: &str = "Task";
pub const LABEL_CONTEXT: &str = "Context";
pub const LABEL_CONSTRAINTS: &str = "Constraints";
pub const LABEL_TONE: &str = "Tone";
pub const LABEL_FORMAT: &str = "Output format";
pub const LABEL_LANGUAGE: &str = "Language";
pub const LABEL_INSTRUCTIONS: &str = "Instructions";

const HEADING: &str = "## ";
const ESCAPE: char = '\\';

const PREAMBLE: &str = "Follow the sections below to produce your answer.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeWarning {
    #[error("No task given; a generic task will be used")]
    EmptyTask,
    #[error("Dual-language mode with the same source and target language ({0})")]
    SameLanguages(String),
    #[error("Duplicate tag '{0}' ignored")]
    DuplicateTag(String),
}

impl ComposeWarning {
    /// Warnings that stop a submission unless the caller forces it.
    pub fn blocks_submission(&self) -> bool {
        matches!(self, ComposeWarning::EmptyTask)
    }
}

/// Caller-visible problems with a request. Composition itself never fails.
pub fn validate(request: &GenerationRequest) -> Vec<ComposeWarning> {
    let mut warnings = Vec::new();
    if request.task.trim().is_empty() {
        warnings.push(ComposeWarning::EmptyTask);
    }
    if let Some(lang) = &request.language
        && lang.mode == LanguageMode::Dual
        && lang.source.trim().eq_ignore_ascii_case(lang.target.trim())
    {
        warnings.push(ComposeWarning::SameLanguages(lang.source.trim().to_string()));
    }
    let mut seen = HashSet::new();
    for tag in request.tags.iter().map(|t| clean_tag(t)).filter(|t| !t.is_empty()) {
        if !seen.insert(tag.to_lowercase()) {
            warnings.push(ComposeWarning::DuplicateTag(tag));
        }
    }
    warnings
}

fn clean_tag(tag: &str) -> String {
    tag.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tags trimmed, whitespace-collapsed, empties dropped, case-insensitive duplicates removed.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|t| clean_tag(t))
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}

fn escape_body(body: &str) -> String {
    body.lines()
        .map(|line| {
            if line.starts_with(HEADING.trim_end()) || line.starts_with(ESCAPE) {
                format!("{}{}", ESCAPE, line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_section(out: &mut String, label: &str, body: &str) {
    let body = body.trim();
    if body.is_empty() {
        return;
    }
    out.push_str("\n\n");
    out.push_str(HEADING);
    out.push_str(label);
    out.push('\n');
    out.push_str(&escape_body(body));
}

/// Render the request. Pure; the result is never empty.
pub fn compose(request: &GenerationRequest) -> String {
    let mut out = String::from(PREAMBLE);

    let task = if request.task.trim().is_empty() {
        DEFAULT_TASK
    } else {
        request.task.as_str()
    };

    push_section(&mut out, LABEL_ROLE, &request.persona);
    push_section(&mut out, LABEL_TASK, task);
    push_section(&mut out, LABEL_CONTEXT, &request.context);

    let constraints = normalize_tags(&request.tags)
        .iter()
        .map(|t| format!("- {}", t))
        .collect::<Vec<_>>()
        .join("\n");
    push_section(&mut out, LABEL_CONSTRAINTS, &constraints);

    push_section(&mut out, LABEL_TONE, &request.tone);
    if let Some(format) = request.output_format {
        push_section(&mut out, LABEL_FORMAT, format.instruction());
    }
    if let Some(lang) = &request.language {
        push_section(&mut out, LABEL_LANGUAGE, &lang.directive());
    }

    let mut closing = String::new();
    if !request.persona.trim().is_empty() {
        closing.push_str("Act as the persona under Role. ");
    }
    closing.push_str("Carry out the Task");
    if !constraints.is_empty() {
        closing.push_str(" while honouring every Constraint");
    }
    closing.push_str(", and shape the response as requested above.");
    push_section(&mut out, LABEL_INSTRUCTIONS, &closing);

    log::debug!("composed prompt: {} bytes", out.len());
    out
}

/// One `## <Label>` section read back from a composed prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub label: String,
    pub body: String,
}

/// Sections recovered from a composed prompt, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedPrompt {
    pub sections: Vec<Section>,
}

impl ParsedPrompt {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.body.as_str())
    }

    pub fn persona(&self) -> Option<&str> {
        self.get(LABEL_ROLE)
    }

    pub fn task(&self) -> Option<&str> {
        self.get(LABEL_TASK)
    }

    pub fn tone(&self) -> Option<&str> {
        self.get(LABEL_TONE)
    }

    pub fn tags(&self) -> Vec<&str> {
        self.get(LABEL_CONSTRAINTS)
            .map(|body| {
                body.lines()
                    .filter_map(|l| l.strip_prefix("- "))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Split a composed prompt into its labeled sections. Text before the first
/// heading is ignored.
pub fn parse_sections(text: &str) -> ParsedPrompt {
    fn close(current: &mut Option<(String, Vec<String>)>, sections: &mut Vec<Section>) {
        if let Some((label, lines)) = current.take() {
            sections.push(Section {
                label,
                body: lines.join("\n").trim_end().to_string(),
            });
        }
    }

    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in text.lines() {
        if let Some(label) = line.strip_prefix(HEADING) {
            close(&mut current, &mut sections);
            current = Some((label.trim().to_string(), Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            let unescaped = line.strip_prefix(ESCAPE).unwrap_or(line);
            lines.push(unescaped.to_string());
        }
    }
    close(&mut current, &mut sections);

    ParsedPrompt { sections }
}
