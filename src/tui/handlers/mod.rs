//! Event handlers for the TUI.

mod chat_spawn;
mod input;
mod model_selector;
mod popups;
mod shortcuts;

use crossterm::event::{KeyEvent, KeyEventKind};
use std::sync::Arc;
use std::sync::mpsc;

use tokio::runtime::Runtime;

use crate::core::config::Config;
use crate::core::llm::ChatError;
use crate::core::models::{ResolveError, Resolution};

use super::app::App;
use super::shortcuts::Shortcut;

pub(crate) use chat_spawn::spawn_resolution;

/// Receivers for a request in progress: streamed deltas, then the final result.
pub struct PendingChat {
    pub stream_rx: mpsc::Receiver<String>,
    pub result_rx: mpsc::Receiver<Result<(), ChatError>>,
}

pub type PendingResolution = mpsc::Receiver<Result<Resolution, ResolveError>>;

/// Result of handling an event: continue the loop or exit.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    Continue,
    Break,
}

/// Bundles the mutable loop state a key press may touch.
pub struct HandleKeyContext<'a> {
    pub app: &'a mut App,
    pub config: &'a mut Arc<Config>,
    pub pending_chat: &'a mut Option<PendingChat>,
    pub pending_resolution: &'a mut Option<PendingResolution>,
    pub rt: &'a Arc<Runtime>,
}

/// Handle a key event. Returns HandleResult::Break to exit the main loop.
pub fn handle_key(key: KeyEvent, ctx: HandleKeyContext<'_>) -> HandleResult {
    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }
    let shortcut = Shortcut::match_key(&key);
    if shortcut == Some(Shortcut::Quit) {
        return HandleResult::Break;
    }
    if ctx.app.popup.is_some() {
        popups::handle_popup_key(key.code, key.modifiers, ctx.app);
        return HandleResult::Continue;
    }
    if let Some(shortcut) = shortcut {
        return shortcuts::handle_shortcut(shortcut, ctx);
    }
    input::handle_main_input(key.code, key.modifiers, ctx)
}
