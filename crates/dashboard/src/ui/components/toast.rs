use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};

use crate::{
    app::{ToastLevel, ToastState},
    ui::theme::Theme,
};

const MAX_WIDTH: u16 = 60;
const MAX_TEXT_LINES: u16 = 3;

/// Bottom-right corner above the key hints. Long messages wrap up to
/// three lines inside a box at most [`MAX_WIDTH`] wide.
fn toast_rect(area: Rect, message: &str) -> Rect {
    let text_width = message.chars().count() as u16 + 2;
    let width = (text_width + 4).min(MAX_WIDTH).min(area.width);
    let inner = width.saturating_sub(4).max(1);
    let text_lines = text_width.div_ceil(inner).clamp(1, MAX_TEXT_LINES);
    let height = (text_lines + 2).min(area.height);

    Rect {
        x: area.x + area.width - width,
        y: area.y + area.height.saturating_sub(height + 1),
        width,
        height,
    }
}

pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&ToastState>) {
    let Some(toast) = toast else {
        return;
    };
    let theme = Theme::default();
    let (mark, color) = match toast.level {
        ToastLevel::Info => ("·", theme.text),
        ToastLevel::Success => ("✓", theme.positive),
        ToastLevel::Error => ("✗", theme.error),
    };

    let rect = toast_rect(area, &toast.message);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme.panel));
    let line = Line::from(vec![
        Span::styled(
            format!("{mark} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(toast.message.as_str(), Style::default().fg(theme.text)),
    ]);

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(line)
            .wrap(Wrap { trim: true })
            .block(block.padding(Padding::horizontal(1))),
        rect,
    );
}
