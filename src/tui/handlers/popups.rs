//! Key routing while a popup is open.

use crossterm::event::{KeyCode, KeyModifiers};

use super::super::app::{App, Popup};
use super::model_selector::{ModelSelectorAction, handle_model_selector_key};

pub(super) fn handle_popup_key(key_code: KeyCode, key_modifiers: KeyModifiers, app: &mut App) {
    let Some(popup) = app.popup.as_mut() else {
        return;
    };
    match popup {
        Popup::ModelSelector(selector) => {
            match handle_model_selector_key(key_code, key_modifiers, selector) {
                ModelSelectorAction::Close => app.popup = None,
                ModelSelectorAction::Select(model) => app.apply_model(&model),
                ModelSelectorAction::Keep => {}
            }
        }
        Popup::SystemInstruction(draft) => match (key_code, key_modifiers) {
            (KeyCode::Enter, mods)
                if mods.contains(KeyModifiers::ALT) || mods.contains(KeyModifiers::SHIFT) =>
            {
                draft.push('\n');
            }
            (KeyCode::Enter, _) => {
                let text = std::mem::take(draft);
                app.save_system_instruction(&text);
            }
            (KeyCode::Esc, _) => app.popup = None,
            (KeyCode::Backspace, _) => {
                draft.pop();
            }
            (KeyCode::Char(c), mods)
                if !mods.intersects(KeyModifiers::ALT | KeyModifiers::CONTROL) =>
            {
                draft.push(c);
            }
            _ => {}
        },
    }
}
