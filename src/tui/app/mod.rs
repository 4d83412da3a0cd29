//! TUI application state: session, input, scroll, status banner.

mod settings;
mod turns;

pub(crate) use settings::{ModelSelectorState, Popup, TEMPERATURE_STEP};
pub(crate) use turns::{DisplayBlock, Speaker};

use std::time::Instant;

use crate::core::chat::{GenerationSettings, PendingTurn, Session, SessionError};
use crate::core::llm::ChatError;
use crate::core::models::{ResolveError, Resolution};

/// One line under the transcript. `Blocking` means generation is disabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Warning(String),
    Error(String),
    Blocking(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Info(s) | Status::Warning(s) | Status::Error(s) | Status::Blocking(s) => s,
        }
    }
}

pub struct App {
    pub(super) session: Session,
    pub(super) input: String,
    pub(super) scroll: usize,
    pub(super) last_max_scroll: usize,
    /// Keep the view pinned to the newest line while text streams in.
    pub(super) follow_tail: bool,
    pub(super) status: Option<Status>,
    /// Model resolution in progress.
    pub(super) resolving: bool,
    pub(super) copy_toast_until: Option<Instant>,
    /// Model picker or system-instruction editor; takes all keys while open.
    pub(super) popup: Option<Popup>,
}

impl App {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            session: Session::new(settings),
            input: String::new(),
            scroll: 0,
            last_max_scroll: 0,
            follow_tail: true,
            status: None,
            resolving: true,
            copy_toast_until: None,
            popup: None,
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.session.turn().state().is_busy()
    }

    pub(crate) fn is_blocked(&self) -> bool {
        matches!(self.status, Some(Status::Blocking(_)))
    }

    /// Header label: the resolved model, or what is happening instead.
    pub(crate) fn model_label(&self) -> String {
        match self.session.model() {
            Some(m) => m.to_string(),
            None if self.resolving => "resolving…".to_string(),
            None => "no model".to_string(),
        }
    }

    pub(crate) fn start_resolution(&mut self) {
        self.resolving = true;
        self.status = Some(Status::Info("Selecting a model…".to_string()));
    }

    /// Store the background resolution result. Fatal errors disable generation.
    pub(crate) fn apply_resolution(&mut self, result: Result<Resolution, ResolveError>) {
        self.resolving = false;
        match result {
            Ok(resolution) => {
                self.status = resolution.warning.clone().map(Status::Warning);
                self.session.set_resolution(resolution);
            }
            Err(e) => {
                self.status = Some(Status::Blocking(crate::run::blocking_message(&e)));
            }
        }
    }

    /// Take the input and start a turn. Returns `None` (with a status) when refused.
    pub(crate) fn submit(&mut self) -> Option<PendingTurn> {
        if self.is_blocked() {
            return None;
        }
        if self.resolving {
            self.status = Some(Status::Info("Still selecting a model…".to_string()));
            return None;
        }
        match self.session.begin_turn(&self.input) {
            Ok(pending) => {
                self.input.clear();
                self.status = None;
                self.follow_tail = true;
                Some(pending)
            }
            Err(SessionError::EmptyPrompt) => None,
            Err(e) => {
                self.status = Some(Status::Warning(e.to_string()));
                None
            }
        }
    }

    pub(crate) fn push_chunk(&mut self, chunk: &str) {
        self.session.push_chunk(chunk);
    }

    /// The worker finished. Failures become a transcript notice; the session stays usable.
    pub(crate) fn finish_turn(&mut self, result: Result<(), ChatError>) {
        match result {
            Ok(()) => {
                self.session.complete_turn();
            }
            Err(e) => {
                self.session.fail_turn(&e);
                self.status = Some(Status::Error(e.to_string()));
            }
        }
        self.follow_tail = true;
    }

    /// Clear the conversation. Refused while a response is streaming.
    pub(crate) fn new_conversation(&mut self) {
        if self.is_busy() {
            self.status = Some(Status::Info(
                "Wait for the current response before starting over".to_string(),
            ));
            return;
        }
        self.session.reset();
        self.scroll = 0;
        self.last_max_scroll = 0;
        self.follow_tail = true;
        if !self.is_blocked() {
            self.status = None;
        }
    }

    pub(crate) fn last_answer(&self) -> Option<&str> {
        self.session.transcript().last_model_text()
    }

    pub(crate) fn scroll_up(&mut self, lines: usize) {
        self.follow_tail = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub(crate) fn scroll_down(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.last_max_scroll);
        if self.scroll >= self.last_max_scroll {
            self.follow_tail = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat::{FAILURE_PLACEHOLDER, TurnState};

    fn ready_app() -> App {
        let mut app = App::new(GenerationSettings {
            system_instruction: None,
            temperature: 1.0,
        });
        app.apply_resolution(Ok(Resolution::explicit("gemini-1.5-flash")));
        app
    }

    #[test]
    fn submit_clears_input_and_marks_busy() {
        let mut app = ready_app();
        app.input = "hello".to_string();
        let pending = app.submit().unwrap();
        assert_eq!(pending.prompt, "hello");
        assert!(app.input.is_empty());
        assert!(app.is_busy());

        app.input = "again".to_string();
        assert!(app.submit().is_none());
        assert_eq!(app.input, "again");
    }

    #[test]
    fn fatal_resolution_blocks_submission() {
        let mut app = App::new(GenerationSettings {
            system_instruction: None,
            temperature: 1.0,
        });
        app.apply_resolution(Err(ResolveError::AllCandidatesFailed {
            tried: 5,
            last_error: "API key not valid".to_string(),
        }));
        assert!(app.is_blocked());
        app.input = "hi".to_string();
        assert!(app.submit().is_none());
        assert!(app.session.transcript().is_empty());
    }

    #[test]
    fn degraded_resolution_shows_warning_but_allows_chat() {
        let mut app = App::new(GenerationSettings {
            system_instruction: None,
            temperature: 1.0,
        });
        app.apply_resolution(Ok(Resolution {
            model: "gemini-1.5-flash".to_string(),
            candidates: vec!["gemini-1.5-flash".to_string()],
            warning: Some("listing failed".to_string()),
        }));
        assert!(matches!(app.status, Some(Status::Warning(_))));
        app.input = "hi".to_string();
        assert!(app.submit().is_some());
    }

    #[test]
    fn failed_turn_records_placeholder_and_allows_retry() {
        let mut app = ready_app();
        app.input = "q".to_string();
        app.submit().unwrap();
        app.finish_turn(Err(ChatError::Timeout(120)));
        assert_eq!(app.session.turn().state(), TurnState::Failed);
        assert_eq!(app.last_answer(), Some(FAILURE_PLACEHOLDER));
        assert!(matches!(app.status, Some(Status::Error(_))));

        app.input = "retry".to_string();
        assert!(app.submit().is_some());
    }

    #[test]
    fn reset_is_refused_while_streaming() {
        let mut app = ready_app();
        app.input = "q".to_string();
        app.submit().unwrap();
        app.push_chunk("partial");
        app.new_conversation();
        assert_eq!(app.session.transcript().len(), 1);

        app.finish_turn(Ok(()));
        app.new_conversation();
        assert!(app.session.transcript().is_empty());
        assert_eq!(app.model_label(), "gemini-1.5-flash");
    }
}
