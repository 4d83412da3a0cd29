//! The structured input the composer renders.

use std::fmt;
use std::str::FromStr;

/// Separates the two variants of a dual-language response. Emitted by the
/// composer's language directive and consumed by [`crate::core::chat::split_dual`].
pub const DUAL_SENTINEL: &str = "<<<===LANG-SPLIT===>>>";

/// Used when the user supplies no task, so the prompt is never empty.
pub const DEFAULT_TASK: &str = "Help the user with their request as clearly and accurately as possible.";

pub const DEFAULT_SOURCE_LANGUAGE: &str = "English";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Korean";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Paragraphs,
    Bullets,
    Table,
    Json,
    Markdown,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Paragraphs,
        OutputFormat::Bullets,
        OutputFormat::Table,
        OutputFormat::Json,
        OutputFormat::Markdown,
    ];

    /// Body of the `Output format` section.
    pub fn instruction(self) -> &'static str {
        match self {
            OutputFormat::Paragraphs => "Answer in plain prose paragraphs.",
            OutputFormat::Bullets => "Answer as a concise bulleted list.",
            OutputFormat::Table => "Answer as a Markdown table, with a short sentence before it if needed.",
            OutputFormat::Json => "Answer with a single valid JSON document and nothing else.",
            OutputFormat::Markdown => "Answer in Markdown with headings where they help.",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Paragraphs => "paragraphs",
            OutputFormat::Bullets => "bullets",
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        };
        f.write_str(s)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paragraphs" | "prose" => Ok(OutputFormat::Paragraphs),
            "bullets" | "list" => Ok(OutputFormat::Bullets),
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!(
                "unknown output format '{}' (expected paragraphs, bullets, table, json or markdown)",
                other
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LanguageMode {
    /// Only the source language.
    #[default]
    Source,
    /// Only the target language.
    Target,
    /// Both, separated by [`DUAL_SENTINEL`].
    Dual,
}

impl fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LanguageMode::Source => "source",
            LanguageMode::Target => "target",
            LanguageMode::Dual => "dual",
        };
        f.write_str(s)
    }
}

impl FromStr for LanguageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "source" => Ok(LanguageMode::Source),
            "target" => Ok(LanguageMode::Target),
            "dual" | "both" => Ok(LanguageMode::Dual),
            other => Err(format!(
                "unknown language mode '{}' (expected source, target or dual)",
                other
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageSpec {
    pub mode: LanguageMode,
    pub source: String,
    pub target: String,
}

impl Default for LanguageSpec {
    fn default() -> Self {
        Self {
            mode: LanguageMode::default(),
            source: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

impl LanguageSpec {
    /// Body of the `Language` section.
    pub fn directive(&self) -> String {
        match self.mode {
            LanguageMode::Source => format!("Respond only in {}.", self.source.trim()),
            LanguageMode::Target => format!("Respond only in {}.", self.target.trim()),
            LanguageMode::Dual => format!(
                "Respond twice: first entirely in {}, then entirely in {}.\n\
                 Between the two versions write this marker alone on its own line: {}\n\
                 Do not use the marker anywhere else.",
                self.source.trim(),
                self.target.trim(),
                DUAL_SENTINEL
            ),
        }
    }
}

/// One submission's worth of user selections. Built fresh each time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationRequest {
    pub persona: String,
    pub task: String,
    pub context: String,
    pub tags: Vec<String>,
    pub tone: String,
    pub output_format: Option<OutputFormat>,
    pub language: Option<LanguageSpec>,
}

impl GenerationRequest {
    pub fn is_dual(&self) -> bool {
        self.language
            .as_ref()
            .is_some_and(|l| l.mode == LanguageMode::Dual)
    }
}
