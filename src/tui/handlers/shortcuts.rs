//! Shortcut key handling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::config;
use crate::tui::shortcuts::Shortcut;

use super::super::app::{Status, TEMPERATURE_STEP};
use super::super::constants::TOAST_MILLIS;
use super::{HandleKeyContext, HandleResult, spawn_resolution};

pub(super) fn handle_shortcut(shortcut: Shortcut, ctx: HandleKeyContext<'_>) -> HandleResult {
    let HandleKeyContext {
        app,
        config,
        pending_chat,
        pending_resolution,
        rt,
    } = ctx;

    match shortcut {
        Shortcut::Quit => return HandleResult::Break,
        Shortcut::NewConversation => app.new_conversation(),
        Shortcut::ModelSelector => app.open_model_selector(),
        Shortcut::SystemInstruction => app.open_system_editor(),
        Shortcut::TemperatureUp => app.adjust_temperature(TEMPERATURE_STEP),
        Shortcut::TemperatureDown => app.adjust_temperature(-TEMPERATURE_STEP),
        Shortcut::CopyAnswer => match app.last_answer().map(str::to_string) {
            Some(text) => match arboard::Clipboard::new().and_then(|mut c| c.set_text(text)) {
                Ok(()) => {
                    app.copy_toast_until = Some(Instant::now() + Duration::from_millis(TOAST_MILLIS))
                }
                Err(e) => {
                    log::warn!("clipboard unavailable: {}", e);
                    app.status = Some(Status::Warning(format!("Clipboard unavailable: {}", e)));
                }
            },
            None => app.status = Some(Status::Info("Nothing to copy yet".to_string())),
        },
        Shortcut::RetryModel => {
            if pending_chat.is_some() || pending_resolution.is_some() {
                app.status = Some(Status::Info("Busy; try again in a moment".to_string()));
                return HandleResult::Continue;
            }
            // The key may have been changed with `config set-api-key` meanwhile.
            match config::load() {
                Ok(fresh) => {
                    *config = Arc::new(fresh.with_model(config.model_id.clone()));
                    app.start_resolution();
                    *pending_resolution = Some(spawn_resolution(rt, Arc::clone(config)));
                }
                Err(e) => app.status = Some(Status::Blocking(e.to_string())),
            }
        }
    }
    HandleResult::Continue
}
