//! Handler for the model picker popup.

use crossterm::event::{KeyCode, KeyModifiers};

use super::super::app::ModelSelectorState;

/// Action to apply after handling a model selector key.
pub(crate) enum ModelSelectorAction {
    Close,
    Select(String),
    /// No action; keep the selector open.
    Keep,
}

/// Handle key when the model selector is open. Returns the action; caller applies it to the app.
pub(crate) fn handle_model_selector_key(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    selector: &mut ModelSelectorState,
) -> ModelSelectorAction {
    // Filter input
    match key_code {
        KeyCode::Backspace => {
            selector.filter.pop();
        }
        KeyCode::Char(c) if !key_modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            selector.filter.push(c);
        }
        _ => {}
    }

    let filtered_len = selector.filtered().len();
    match key_code {
        KeyCode::Esc => ModelSelectorAction::Close,
        KeyCode::Up => {
            selector.selected_index = selector.selected_index.saturating_sub(1);
            ModelSelectorAction::Keep
        }
        KeyCode::Down => {
            if filtered_len > 0 {
                selector.selected_index =
                    (selector.selected_index + 1).min(filtered_len.saturating_sub(1));
            }
            ModelSelectorAction::Keep
        }
        KeyCode::Enter => match selector.filtered().get(selector.selected_index) {
            Some(model) => ModelSelectorAction::Select(model.to_string()),
            None => ModelSelectorAction::Keep,
        },
        KeyCode::Backspace | KeyCode::Char(_) => {
            selector.selected_index = selector
                .selected_index
                .min(filtered_len.saturating_sub(1));
            ModelSelectorAction::Keep
        }
        _ => ModelSelectorAction::Keep,
    }
}
