use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Paragraph},
};

use crate::{
    money::AmountFormat,
    ui::{components::panel::Panel, theme::Theme},
    views::ChartSpec,
};

const BAR_WIDTH: usize = 16;

/// Renders a share-of-total breakdown, one line per slice.
///
/// Terminal stand-in for a pie chart: each slice gets a bar proportional to
/// its share and the percentage next to it.
pub fn render_breakdown(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    spec: Option<&ChartSpec>,
    format: &AmountFormat,
    theme: &Theme,
) {
    let panel = Panel::new(title, theme);
    let Some(spec) = spec.filter(|spec| !spec.values.is_empty()) else {
        panel.render(frame, area, no_data(theme));
        return;
    };

    let total: f64 = spec.values.iter().map(|value| value.max(0.0)).sum();
    let label_width = spec
        .labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(18);

    let lines: Vec<Line<'_>> = spec
        .points()
        .map(|(label, value)| {
            let label: String = label.chars().take(label_width).collect();
            Line::from(vec![
                Span::styled(
                    format!("{label:<label_width$} "),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    ascii_bar(value, total, BAR_WIDTH),
                    Style::default().fg(theme.accent),
                ),
                Span::styled(
                    format!(" {:>3}% ", compute_percentage(value, total)),
                    Style::default().fg(theme.dim),
                ),
                Span::raw(format.amount(value)),
            ])
        })
        .collect();

    panel.render(frame, area, Paragraph::new(lines));
}

/// Renders a vertical bar chart, one bar per label, in the given order.
pub fn render_bar_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    spec: Option<&ChartSpec>,
    theme: &Theme,
) {
    let title = match spec.and_then(|spec| spec.series.as_deref()) {
        Some(series) => format!("{title} · {series}"),
        None => title.to_string(),
    };
    let panel = Panel::new(&title, theme);
    let Some(spec) = spec.filter(|spec| !spec.values.is_empty()) else {
        panel.render(frame, area, no_data(theme));
        return;
    };

    let data: Vec<(&str, u64)> = spec
        .points()
        .map(|(label, value)| (label, value.max(0.0).round() as u64))
        .collect();

    let chart = BarChart::default()
        .data(data.as_slice())
        .bar_width(7)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.dim));

    panel.render(frame, area, chart);
}

fn no_data(theme: &Theme) -> Paragraph<'static> {
    Paragraph::new(Span::styled("No data", Style::default().fg(theme.dim)))
}

/// Creates an ASCII horizontal bar, e.g. `████████░░░░░░░░`.
#[must_use]
pub fn ascii_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }

    let ratio = (value / max).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Share of `value` in `total`, rounded to a whole percent.
#[must_use]
pub fn compute_percentage(value: f64, total: f64) -> u16 {
    if total <= 0.0 {
        return 0;
    }
    ((value.max(0.0) / total) * 100.0).round().min(100.0) as u16
}
