//! Session-scoped context: transcript, resolved model, generation settings.
//!
//! Created when a session starts and cleared only by an explicit reset.

use crate::core::config::{self, Config};
use crate::core::llm::{ChatError, ChatRequest};
use crate::core::models::Resolution;

use super::transcript::{Transcript, Turn};
use super::turn::StreamingTurn;

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationSettings {
    pub system_instruction: Option<String>,
    pub temperature: f32,
}

impl GenerationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            system_instruction: config.system_instruction.clone(),
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("A response is still in progress")]
    Busy,
    #[error("No model has been resolved for this session")]
    NoModel,
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("'{0}' is not one of the candidate models")]
    UnknownModel(String),
}

/// Owned snapshot of one submission; can be moved to a worker thread.
#[derive(Clone, Debug)]
pub struct PendingTurn {
    pub model: String,
    pub system: Option<String>,
    pub temperature: f32,
    /// Transcript before this submission.
    pub history: Vec<Turn>,
    pub prompt: String,
}

impl PendingTurn {
    pub fn request(&self) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            system: self.system.as_deref(),
            temperature: self.temperature,
            history: &self.history,
            prompt: &self.prompt,
            max_tokens: None,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    transcript: Transcript,
    turn: StreamingTurn,
    resolution: Option<Resolution>,
    settings: GenerationSettings,
}

impl Session {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            transcript: Transcript::default(),
            turn: StreamingTurn::default(),
            resolution: None,
            settings,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn turn(&self) -> &StreamingTurn {
        &self.turn
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn model(&self) -> Option<&str> {
        self.resolution.as_ref().map(|r| r.model.as_str())
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = Some(resolution);
    }

    /// Switch to another candidate model. Applies from the next `begin_turn`;
    /// a request already in flight keeps the model it was sent with.
    pub fn select_model(&mut self, model: &str) -> Result<(), SessionError> {
        let current = self.resolution.as_ref().ok_or(SessionError::NoModel)?;
        let chosen = current
            .choose(model)
            .ok_or_else(|| SessionError::UnknownModel(model.to_string()))?;
        log::info!("model switched to {}", chosen.model);
        self.set_resolution(chosen);
        Ok(())
    }

    /// Clamped to [0, 2]. Returns the value stored.
    pub fn set_temperature(&mut self, temperature: f32) -> f32 {
        self.settings.temperature = config::clamp_temperature(temperature);
        self.settings.temperature
    }

    /// Blank text clears the instruction.
    pub fn set_system_instruction(&mut self, text: &str) {
        let text = text.trim();
        self.settings.system_instruction = (!text.is_empty()).then(|| text.to_string());
    }

    /// Record the user turn and move the turn state machine to `AwaitingResponse`.
    /// The returned history holds every turn before this prompt.
    pub fn begin_turn(&mut self, prompt: &str) -> Result<PendingTurn, SessionError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SessionError::EmptyPrompt);
        }
        let model = self.model().ok_or(SessionError::NoModel)?.to_string();
        if self.turn.state().is_busy() {
            return Err(SessionError::Busy);
        }
        let history = self.transcript.turns().to_vec();
        self.turn.submit();
        self.transcript.push_user(prompt);
        Ok(PendingTurn {
            model,
            system: self.settings.system_instruction.clone(),
            temperature: self.settings.temperature,
            history,
            prompt: prompt.to_string(),
        })
    }

    pub fn push_chunk(&mut self, chunk: &str) {
        self.turn.push_chunk(chunk);
    }

    /// Stream ended: append the accumulated text as one model turn.
    pub fn complete_turn(&mut self) -> Option<&Turn> {
        let text = self.turn.finish()?;
        Some(self.transcript.push_model(text))
    }

    /// Request failed: append the partial text (or a placeholder) with a notice.
    pub fn fail_turn(&mut self, error: &ChatError) -> &Turn {
        log::warn!("turn failed: {}", error);
        let text = self.turn.fail(&error.to_string());
        self.transcript.push_model(text)
    }

    /// Clear the transcript and any turn state. The resolved model is kept.
    pub fn reset(&mut self) {
        self.transcript.reset();
        self.turn.reset();
    }
}
