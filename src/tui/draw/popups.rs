//! Popups: model selector, system-instruction editor.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::super::app::ModelSelectorState;
use super::super::constants::ACCENT;

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let vertical_areas = vertical.split(area);
    let horizontal_areas = horizontal.split(vertical_areas[0]);
    horizontal_areas[0]
}

fn dim_italic(text: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )))
}

pub(crate) fn draw_model_selector_popup(
    f: &mut Frame,
    area: Rect,
    selector: &mut ModelSelectorState,
    current: Option<&str>,
) {
    let popup_rect = popup_area(area, 60, 50);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Select model (Alt+M) ");

    let inner = block.inner(popup_rect);
    f.render_widget(Clear, popup_rect);
    f.render_widget(block, popup_rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);
    let filter_area = chunks[0];
    let list_area = chunks[1];
    let hint_area = chunks[2];

    let filter_content = if selector.filter.is_empty() {
        Span::styled("Filter... ", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(selector.filter.as_str())
    };
    let filter_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let filter_inner = filter_block.inner(filter_area);
    f.render_widget(
        Paragraph::new(Line::from(filter_content)).block(filter_block),
        filter_area,
    );
    let cx = filter_inner.x
        + selector
            .filter
            .chars()
            .count()
            .min(filter_inner.width as usize) as u16;
    f.set_cursor_position(Position::new(cx, filter_area.y + 1));

    let filtered: Vec<String> = selector.filtered().into_iter().cloned().collect();
    selector.selected_index = selector
        .selected_index
        .min(filtered.len().saturating_sub(1));

    if filtered.is_empty() {
        let msg = if selector.filter.is_empty() {
            "No models"
        } else {
            "No models match filter"
        };
        f.render_widget(dim_italic(msg), list_area);
    } else {
        let items: Vec<ListItem> = filtered
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let style = if i == selector.selected_index {
                    Style::default().fg(Color::Black).bg(ACCENT)
                } else {
                    Style::default()
                };
                let marker = if current == Some(m.as_str()) { "● " } else { "  " };
                ListItem::new(Line::from(Span::styled(format!("{}{}", marker, m), style)))
            })
            .collect();
        selector.list_state.select(Some(selector.selected_index));
        f.render_stateful_widget(List::new(items), list_area, &mut selector.list_state);
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            "↑↓ move · Enter select · Esc close",
            Style::default().fg(Color::DarkGray),
        )),
        hint_area,
    );
}

pub(crate) fn draw_system_popup(f: &mut Frame, area: Rect, draft: &str) {
    let popup_rect = popup_area(area, 70, 40);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" System instruction · Enter save · Alt+Enter newline · Esc cancel ");
    let inner = block.inner(popup_rect);
    f.render_widget(Clear, popup_rect);

    let para = if draft.is_empty() {
        dim_italic("No system instruction (empty clears it)").block(block)
    } else {
        let lines: Vec<Line> = draft.split('\n').map(|l| Line::raw(l.to_string())).collect();
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false })
    };
    f.render_widget(para, popup_rect);

    if inner.width > 0 && inner.height > 0 {
        let last = draft.rsplit('\n').next().unwrap_or_default();
        let row = (draft.split('\n').count() as u16).saturating_sub(1);
        let col = (last.chars().count() as u16).min(inner.width - 1);
        f.set_cursor_position(Position::new(inner.x + col, inner.y + row.min(inner.height - 1)));
    }
}
