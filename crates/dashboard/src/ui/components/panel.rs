//! Bordered panels of the dashboard screen and the summary figures.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::ui::theme::Theme;

/// Border treatment of a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Plain,
    /// Popup or panel that owns the keyboard.
    Focused,
    /// The figure the budget alert is about.
    Alert,
}

impl Tone {
    fn border(self, theme: &Theme) -> Color {
        match self {
            Tone::Plain => theme.border,
            Tone::Focused => theme.border_focused,
            Tone::Alert => theme.warning,
        }
    }

    fn title(self, theme: &Theme) -> Color {
        match self {
            Tone::Alert => theme.warning,
            _ => theme.accent,
        }
    }
}

pub struct Panel<'a> {
    title: &'a str,
    theme: &'a Theme,
    tone: Tone,
}

impl<'a> Panel<'a> {
    pub fn new(title: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            theme,
            tone: Tone::Plain,
        }
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// The frame alone, for widgets that take a block (tables).
    pub fn block(&self) -> Block<'a> {
        Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(self.tone.title(self.theme)),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.tone.border(self.theme)))
            .style(Style::default().bg(self.theme.panel))
    }

    pub fn render<W: Widget>(&self, frame: &mut Frame<'_>, area: Rect, content: W) {
        let block = self.block();
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(content, inner);
    }
}

/// One figure of the summary panel. A missing value shows as `-`.
pub struct Figure<'a> {
    title: &'a str,
    value: Option<String>,
    caption: Option<String>,
    over_budget: bool,
}

impl<'a> Figure<'a> {
    pub fn new(title: &'a str, value: Option<String>) -> Self {
        Self {
            title,
            value,
            caption: None,
            over_budget: false,
        }
    }

    pub fn caption(mut self, caption: Option<String>) -> Self {
        self.caption = caption;
        self
    }

    pub fn over_budget(mut self, over_budget: bool) -> Self {
        self.over_budget = over_budget;
        self
    }

    fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let color = if self.over_budget {
            theme.warning
        } else {
            theme.text
        };
        let value = self.value.clone().unwrap_or_else(|| "-".to_string());
        let mut lines = vec![Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        if let Some(caption) = &self.caption {
            lines.push(Line::from(Span::styled(
                caption.clone(),
                Style::default().fg(theme.dim),
            )));
        }
        lines
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let tone = if self.over_budget {
            Tone::Alert
        } else {
            Tone::Plain
        };
        Panel::new(self.title, theme)
            .tone(tone)
            .render(frame, area, Paragraph::new(self.lines(theme)));
    }
}

/// The budget alert line shown under the figures.
pub fn alert_banner<'a>(message: &'a str, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(Line::from(vec![
        Span::styled(
            " ! ",
            Style::default()
                .fg(theme.panel)
                .bg(theme.warning)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {message}"),
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
}
