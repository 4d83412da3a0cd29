//! Header: activity logo, title, turn state, model name.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use std::sync::OnceLock;
use std::time::Instant;

use crate::core::app;

use super::super::app::App;
use super::super::constants::{LOGO_IDLE, LOGO_THINKING};

/// Start time for the spinner phase.
static HEADER_START: OnceLock<Instant> = OnceLock::new();

/// Max width for model name in header; longer names are truncated with "…".
const MODEL_HEADER_WIDTH: u16 = 36;
const STATE_HEADER_WIDTH: u16 = 12;

fn truncate_left(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        return s.to_string();
    }
    let tail: String = s.chars().skip(count - max.saturating_sub(1)).collect();
    format!("…{}", tail)
}

pub(crate) fn draw_header(f: &mut Frame, app: &mut App, area: Rect, accent: Color) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(STATE_HEADER_WIDTH),
            Constraint::Length(MODEL_HEADER_WIDTH),
        ])
        .split(area);

    let busy = app.is_busy() || app.resolving;
    let logo = if busy {
        let start = HEADER_START.get_or_init(Instant::now);
        let frame = (start.elapsed().as_millis() as usize / 80) % LOGO_THINKING.len();
        LOGO_THINKING[frame]
    } else {
        LOGO_IDLE
    };
    f.render_widget(
        Paragraph::new(Span::styled(format!("{} ", logo), Style::default().fg(accent))),
        chunks[0],
    );

    let title = format!("{} ", app::NAME);
    let title_len = title.chars().count() as u16;
    let title_area = Rect {
        x: area.x + area.width.saturating_sub(title_len) / 2,
        y: area.y,
        width: title_len.min(area.width),
        height: 1.min(area.height),
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            title,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        title_area,
    );

    let state = app.session.turn().state();
    let state_color = if state.is_busy() { accent } else { Color::DarkGray };
    f.render_widget(
        Paragraph::new(Span::styled(state.to_string(), Style::default().fg(state_color)))
            .alignment(Alignment::Right),
        chunks[2],
    );

    let label = format!("{} · t {:.1}", app.model_label(), app.temperature());
    let model = truncate_left(&label, MODEL_HEADER_WIDTH as usize - 1);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            model,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right),
        chunks[3],
    );
}

#[cfg(test)]
mod tests {
    use super::truncate_left;

    #[test]
    fn long_model_names_keep_their_tail() {
        assert_eq!(truncate_left("gemini-1.5-flash", 30), "gemini-1.5-flash");
        assert_eq!(truncate_left("models/gemini-1.5-flash", 8), "…5-flash");
    }
}
