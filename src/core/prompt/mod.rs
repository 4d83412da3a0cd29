//! Prompt composition: structured selections in, one instruction string out.

mod compose;
mod request;

pub use compose::{
    ComposeWarning, LABEL_CONSTRAINTS, LABEL_CONTEXT, LABEL_FORMAT, LABEL_INSTRUCTIONS,
    LABEL_LANGUAGE, LABEL_ROLE, LABEL_TASK, LABEL_TONE, ParsedPrompt, Section, compose,
    normalize_tags, parse_sections, validate,
};
pub use request::{
    DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, DEFAULT_TASK, DUAL_SENTINEL,
    GenerationRequest, LanguageMode, LanguageSpec, OutputFormat,
};
