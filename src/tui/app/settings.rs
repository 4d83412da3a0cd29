//! In-session settings: model picker, temperature, system instruction.

use ratatui::widgets::ListState;

use crate::core::util::filter_by_query;

use super::{App, Status};

/// Temperature change per key press.
pub(crate) const TEMPERATURE_STEP: f32 = 0.1;

pub struct ModelSelectorState {
    /// Candidates from the session's resolution, in priority order.
    pub models: Vec<String>,
    pub selected_index: usize,
    pub list_state: ListState,
    /// Filter query (case-insensitive search on model id).
    pub filter: String,
}

impl ModelSelectorState {
    pub(crate) fn filtered(&self) -> Vec<&String> {
        filter_by_query(&self.models, &self.filter, |m| (m.as_str(), ""))
    }
}

pub enum Popup {
    ModelSelector(ModelSelectorState),
    /// Draft text of the system instruction being edited.
    SystemInstruction(String),
}

impl App {
    /// Open the picker on the current model. Needs a resolution.
    pub(crate) fn open_model_selector(&mut self) {
        let Some(resolution) = self.session.resolution() else {
            self.status = Some(Status::Info("No model list yet".to_string()));
            return;
        };
        let selected_index = resolution
            .candidates
            .iter()
            .position(|c| *c == resolution.model)
            .unwrap_or(0);
        self.popup = Some(Popup::ModelSelector(ModelSelectorState {
            models: resolution.candidates.clone(),
            selected_index,
            list_state: ListState::default(),
            filter: String::new(),
        }));
    }

    pub(crate) fn apply_model(&mut self, model: &str) {
        self.popup = None;
        match self.session.select_model(model) {
            Ok(()) => {
                let note = if self.is_busy() {
                    format!("Model {} applies from the next message", model)
                } else {
                    format!("Model: {}", model)
                };
                self.status = Some(Status::Info(note));
            }
            Err(e) => self.status = Some(Status::Warning(e.to_string())),
        }
    }

    pub(crate) fn open_system_editor(&mut self) {
        let draft = self
            .session
            .settings()
            .system_instruction
            .clone()
            .unwrap_or_default();
        self.popup = Some(Popup::SystemInstruction(draft));
    }

    pub(crate) fn save_system_instruction(&mut self, text: &str) {
        self.popup = None;
        self.session.set_system_instruction(text);
        let note = match &self.session.settings().system_instruction {
            Some(_) => "System instruction updated",
            None => "System instruction cleared",
        };
        self.status = Some(Status::Info(note.to_string()));
    }

    /// Step the temperature, rounded to one decimal and clamped to [0, 2].
    pub(crate) fn adjust_temperature(&mut self, delta: f32) {
        let next = ((self.temperature() + delta) * 10.0).round() / 10.0;
        let stored = self.session.set_temperature(next);
        self.status = Some(Status::Info(format!("Temperature {:.1}", stored)));
    }

    pub(crate) fn temperature(&self) -> f32 {
        self.session.settings().temperature
    }
}
