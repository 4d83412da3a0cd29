//! Handler for main input (typing, submit, scroll).

use crossterm::event::{KeyCode, KeyModifiers};

use super::super::constants;
use super::{HandleKeyContext, HandleResult, chat_spawn};

pub(crate) fn handle_main_input(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    ctx: HandleKeyContext<'_>,
) -> HandleResult {
    let HandleKeyContext {
        app,
        config,
        pending_chat,
        rt,
        ..
    } = ctx;

    match (key_code, key_modifiers) {
        (KeyCode::Enter, mods)
            if mods.contains(KeyModifiers::ALT) || mods.contains(KeyModifiers::SHIFT) =>
        {
            app.input.push('\n');
        }
        (KeyCode::Enter, _) => {
            if pending_chat.is_none()
                && let Some(pending) = app.submit()
            {
                log::info!("submitting turn to {}", pending.model);
                *pending_chat = Some(chat_spawn::spawn_chat(rt, config, pending));
            }
        }
        (KeyCode::Esc, _) => app.input.clear(),
        (KeyCode::Backspace, _) => {
            app.input.pop();
        }
        (KeyCode::Up, _) => app.scroll_up(constants::SCROLL_LINES_SMALL),
        (KeyCode::Down, _) => app.scroll_down(constants::SCROLL_LINES_SMALL),
        (KeyCode::PageUp, _) => app.scroll_up(constants::SCROLL_LINES_PAGE),
        (KeyCode::PageDown, _) => app.scroll_down(constants::SCROLL_LINES_PAGE),
        (KeyCode::Tab, _) => app.input.push_str("    "),
        (KeyCode::Char(c), mods) => {
            if mods.intersects(KeyModifiers::ALT | KeyModifiers::CONTROL) {
                return HandleResult::Continue;
            }
            app.input.push(c);
        }
        _ => {}
    }
    HandleResult::Continue
}
