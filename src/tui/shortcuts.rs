//! Centralized keyboard shortcuts.
//!
//! | Action             | Keys                     |
//! |--------------------|--------------------------|
//! | Send               | Enter                    |
//! | Newline            | Alt+Enter, Shift+Enter   |
//! | Scroll             | ↑ ↓ PageUp PageDown      |
//! | New conversation   | Ctrl+N                   |
//! | Copy last answer   | Ctrl+Y                   |
//! | Retry model        | Ctrl+R (reloads the key) |
//! | Model selector     | Alt+M, µ (Option+M Mac)  |
//! | System instruction | Alt+S                    |
//! | Temperature ±0.1   | Alt+↑ / Alt+↓            |
//! | Quit               | Ctrl+C                   |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Option+M on Mac when Option is not configured as Meta.
const MAC_OPTION_M: char = '\u{00B5}'; // µ

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    NewConversation,
    CopyAnswer,
    /// Reload configuration and resolve the model again.
    RetryModel,
    ModelSelector,
    SystemInstruction,
    TemperatureUp,
    TemperatureDown,
    Quit,
}

impl Shortcut {
    pub fn match_key(key: &KeyEvent) -> Option<Shortcut> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(Shortcut::Quit),
            KeyCode::Char('n') if ctrl => Some(Shortcut::NewConversation),
            KeyCode::Char('y') if ctrl => Some(Shortcut::CopyAnswer),
            KeyCode::Char('r') if ctrl => Some(Shortcut::RetryModel),
            KeyCode::Char('m') if alt => Some(Shortcut::ModelSelector),
            KeyCode::Char(MAC_OPTION_M) => Some(Shortcut::ModelSelector),
            KeyCode::Char('s') if alt => Some(Shortcut::SystemInstruction),
            KeyCode::Up if alt => Some(Shortcut::TemperatureUp),
            KeyCode::Down if alt => Some(Shortcut::TemperatureDown),
            _ => None,
        }
    }
}
