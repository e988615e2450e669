use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::{
    app::{FormKind, FormState},
    ui::{
        components::panel::{Panel, Tone},
        theme::Theme,
    },
};

/// Renders an open form as a popup over the dashboard.
pub fn render(frame: &mut Frame<'_>, area: Rect, form: &FormState, categories: &[String]) {
    let theme = Theme::default();

    let mut lines: Vec<Line<'_>> = form
        .fields()
        .enumerate()
        .map(|(index, (label, value))| {
            let focused = index == form.focus;
            let marker = if focused { "› " } else { "  " };
            let label_style = if focused {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.dim)
            };
            let cursor = if focused { "▏" } else { "" };
            Line::from(vec![
                Span::styled(format!("{marker}{label:<14}"), label_style),
                Span::styled(format!("{value}{cursor}"), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    if let Some(help) = field_help(form, categories) {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(help, Style::default().fg(theme.dim))));
    }
    if let Some(message) = &form.message {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(theme.error),
        )));
    }

    let height = lines.len() as u16 + 4;
    let rect = centered_rect(area, 64, height);
    frame.render_widget(Clear, rect);
    Panel::new(form.kind.title(), &theme).tone(Tone::Focused).render(
        frame,
        rect,
        Paragraph::new(lines).wrap(Wrap { trim: false }),
    );
}

/// Renders the delete confirmation popup.
pub fn render_confirm(frame: &mut Frame<'_>, area: Rect, title: &str) {
    let theme = Theme::default();
    let lines = vec![
        Line::from(format!("Delete \"{title}\"?")),
        Line::from(Span::styled("y / n", Style::default().fg(theme.dim))),
    ];

    let rect = centered_rect(area, 48, 4);
    frame.render_widget(Clear, rect);
    Panel::new("Confirm", &theme)
        .tone(Tone::Alert)
        .render(frame, rect, Paragraph::new(lines));
}

fn field_help(form: &FormState, categories: &[String]) -> Option<String> {
    let label = form.kind.labels().get(form.focus)?;
    let help = match (form.kind, *label) {
        (_, "Kind") => "expense or income (empty: expense)".to_string(),
        (_, "Date" | "Next date" | "From" | "To") => "YYYY-MM-DD".to_string(),
        (_, "Cadence") => "monthly or weekly (empty: monthly)".to_string(),
        (_, "Category") if !categories.is_empty() => format!("Known: {}", categories.join(", ")),
        (FormKind::ImportCsv, _) => "CSV file to upload".to_string(),
        (FormKind::RestoreBackup, _) => "JSON backup to restore".to_string(),
        _ => return None,
    };
    Some(help)
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
