//! Transcript view: one labeled block per turn, with a scrollbar.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use super::super::app::{App, DisplayBlock, Speaker};
use super::super::constants::{ACCENT, ACCENT_SECONDARY};
use super::super::text::wrap_lines;

const PREFIX: &str = "  ┃ ";

fn block_header(block: &DisplayBlock) -> Line<'static> {
    let (label, color) = match block.speaker {
        Speaker::User => ("You".to_string(), ACCENT),
        Speaker::Model => match block.variant {
            Some((i, n)) => (format!("Gemini · {}/{}", i, n), ACCENT_SECONDARY),
            None => ("Gemini".to_string(), ACCENT_SECONDARY),
        },
    };
    Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

/// Wrapped lines for every block, with a blank line between blocks.
pub(crate) fn transcript_lines(blocks: &[DisplayBlock], width: usize) -> Vec<Line<'static>> {
    let body_width = width.saturating_sub(PREFIX.chars().count()).max(1);
    let mut lines = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(block_header(block));
        let bar_color = match block.speaker {
            Speaker::User => ACCENT,
            Speaker::Model => ACCENT_SECONDARY,
        };
        let text_style = if block.streaming {
            Style::default().fg(Color::Gray)
        } else {
            Style::default()
        };
        for chunk in wrap_lines(&block.text, body_width) {
            lines.push(Line::from(vec![
                Span::styled(PREFIX, Style::default().fg(bar_color)),
                Span::styled(chunk, text_style),
            ]));
        }
    }
    lines
}

pub(crate) fn draw_history(f: &mut Frame, app: &mut App, area: Rect) {
    let blocks = app.display_blocks();
    if blocks.is_empty() {
        let hint = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                "Type a message and press Enter.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "Ctrl+N new conversation · Ctrl+Y copy answer · Ctrl+R retry model · Ctrl+C quit",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(hint, area);
        app.last_max_scroll = 0;
        app.scroll = 0;
        return;
    }

    let content_width = area.width.saturating_sub(2) as usize;
    let lines = transcript_lines(&blocks, content_width);
    let visible = area.height as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    app.last_max_scroll = max_scroll;
    if app.follow_tail || app.scroll > max_scroll {
        app.scroll = max_scroll;
    }

    let para = Paragraph::new(lines).scroll((app.scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(para, area);

    if max_scroll > 0 {
        let mut state = ScrollbarState::new(max_scroll).position(app.scroll);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut state,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(speaker: Speaker, text: &str) -> DisplayBlock {
        DisplayBlock {
            speaker,
            variant: None,
            text: text.to_string(),
            streaming: false,
        }
    }

    #[test]
    fn blocks_are_labeled_and_separated() {
        let lines = transcript_lines(
            &[block(Speaker::User, "hi"), block(Speaker::Model, "hello")],
            40,
        );
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text[0], "You");
        assert!(text[1].ends_with("hi"));
        assert_eq!(text[2], "");
        assert_eq!(text[3], "Gemini");
        assert!(text[4].ends_with("hello"));
    }

    #[test]
    fn variants_show_their_position() {
        let mut b = block(Speaker::Model, "x");
        b.variant = Some((2, 2));
        assert_eq!(block_header(&b).to_string(), "Gemini · 2/2");
    }
}
