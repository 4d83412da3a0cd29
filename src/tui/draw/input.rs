//! Status line and input box.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::super::app::{App, Status};
use super::super::constants::ACCENT;

pub(crate) fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let Some(status) = &app.status else {
        return;
    };
    let style = match status {
        Status::Info(_) => Style::default().fg(Color::DarkGray),
        Status::Warning(_) => Style::default().fg(Color::Yellow),
        Status::Error(_) => Style::default().fg(Color::Red),
        Status::Blocking(_) => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
    };
    // Single row: only the first line of a multi-line message.
    let text = status.text().lines().next().unwrap_or_default();
    f.render_widget(Paragraph::new(Span::styled(format!(" {} ", text), style)), area);
}

fn input_title(app: &App) -> &'static str {
    if app.is_blocked() {
        " Generation disabled · Ctrl+R to retry "
    } else if app.is_busy() {
        " Waiting for response… "
    } else {
        " Message · Enter send · Alt+Enter newline · Alt+M model · Alt+S system · Alt+↑↓ temp "
    }
}

pub(crate) fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let border = if app.is_busy() || app.is_blocked() {
        Color::DarkGray
    } else {
        ACCENT
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(input_title(app))
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);

    let content: Vec<Line> = if app.input.is_empty() {
        vec![Line::from(Span::styled(
            "Ask anything...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.input.split('\n').map(|l| Line::raw(l.to_string())).collect()
    };
    let para = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);

    if !app.is_busy() && app.popup.is_none() && inner.width > 0 && inner.height > 0 {
        let last = app.input.rsplit('\n').next().unwrap_or_default();
        let line_count = app.input.split('\n').count() as u16;
        let col = (last.chars().count() as u16).min(inner.width - 1);
        let row = line_count.saturating_sub(1).min(inner.height - 1);
        f.set_cursor_position(Position::new(inner.x + col, inner.y + row));
    }
}
