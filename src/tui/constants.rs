//! TUI constants: colors, timing, layout.

use ratatui::style::Color;

/// Accent blue (#8AB4F8).
pub(super) const ACCENT: Color = Color::Rgb(138, 180, 248);

/// Secondary accent, soft violet (#C58AF9).
pub(super) const ACCENT_SECONDARY: Color = Color::Rgb(197, 138, 249);

/// Event poll timeout in milliseconds (main loop).
pub(crate) const EVENT_POLL_TIMEOUT_MS: u64 = 50;

/// Scroll amount for arrow keys.
pub(crate) const SCROLL_LINES_SMALL: usize = 3;

/// Scroll amount for PageUp/PageDown.
pub(crate) const SCROLL_LINES_PAGE: usize = 10;

/// Input box height including borders.
pub(crate) const INPUT_HEIGHT: u16 = 5;

/// How long the "Copied" toast stays visible.
pub(crate) const TOAST_MILLIS: u64 = 1500;

pub(super) const LOGO_IDLE: &str = "◆";

/// Spinner frames while waiting or streaming (braille pattern, 4 frames).
pub(super) const LOGO_THINKING: &[&str] = &["⠋", "⠙", "⠹", "⠸"];
