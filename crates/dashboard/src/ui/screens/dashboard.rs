use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, Mode},
    dashboard::Dashboard,
    query::encode_filter,
    ui::{
        components::{
            charts,
            hints::{self, hint_separator, hints_to_spans},
            panel::{Figure, Panel, alert_banner},
        },
        theme::Theme,
    },
    views::{CanvasId, SummaryPanel},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, dashboard: &Dashboard, state: &AppState) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Info bar
            Constraint::Length(4),  // Summary figures
            Constraint::Length(1),  // Budget alert
            Constraint::Length(12), // Charts
            Constraint::Min(5),     // Transactions
            Constraint::Length(1),  // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], dashboard, state, &theme);
    render_summary(frame, layout[1], layout[2], dashboard, &theme);
    render_charts(frame, layout[3], dashboard, &theme);
    render_table(frame, layout[4], dashboard, &theme);
    render_bottom_bar(frame, layout[5], state, &theme);
}

fn render_info_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    dashboard: &Dashboard,
    state: &AppState,
    theme: &Theme,
) {
    let months = dashboard.months();
    let month = months
        .selected()
        .map(|option| option.label.as_str())
        .unwrap_or("current");
    let position = format!(
        "{}/{}",
        months.selected_index() + 1,
        months.options().len().max(1)
    );
    let filter = encode_filter(dashboard.filter());
    let filter = if filter.is_empty() {
        "none".to_string()
    } else {
        filter
    };

    let line = Line::from(vec![
        Span::styled("API", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Month", Style::default().fg(theme.dim)),
        Span::raw(format!(": {month} ({position})  ")),
        Span::styled("Filter", Style::default().fg(theme.dim)),
        Span::raw(format!(": {filter}")),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_summary(
    frame: &mut Frame<'_>,
    area: Rect,
    alert_area: Rect,
    dashboard: &Dashboard,
    theme: &Theme,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let empty = SummaryPanel::default();
    let panel = dashboard.summary().unwrap_or(&empty);
    let symbol = &dashboard.format().symbol;
    let figure = |value: &str| (!value.is_empty()).then(|| format!("{symbol} {value}"));

    Figure::new("Expense", figure(&panel.expense))
        .caption(panel.month.clone())
        .over_budget(panel.alert.is_some())
        .render(frame, columns[0], theme);
    Figure::new("Income", figure(&panel.income)).render(frame, columns[1], theme);
    Figure::new("Budget", figure(&panel.budget)).render(frame, columns[2], theme);

    if let Some(alert) = &panel.alert {
        frame.render_widget(alert_banner(alert, theme), alert_area);
    }
}

fn render_charts(frame: &mut Frame<'_>, area: Rect, dashboard: &Dashboard, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let surface = dashboard.surface();
    charts::render_breakdown(
        frame,
        columns[0],
        "Expense by category",
        surface.current(CanvasId::Category),
        dashboard.format(),
        theme,
    );
    charts::render_bar_chart(
        frame,
        columns[1],
        "Monthly trend",
        surface.current(CanvasId::Trend),
        theme,
    );
}

fn render_table(frame: &mut Frame<'_>, area: Rect, dashboard: &Dashboard, theme: &Theme) {
    let table = dashboard.table();
    let title = format!("Transactions ({})", table.rows().len());
    let panel = Panel::new(&title, theme);

    if table.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No transactions",
            Style::default().fg(theme.dim),
        ));
        panel.render(frame, area, empty);
        return;
    }

    let header = Row::new(["Date", "Title", "Category", "Kind", "Amount"]).style(
        Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::BOLD),
    );
    let rows = table.rows().iter().map(|row| {
        let kind_style = if row.kind == "income" {
            Style::default().fg(theme.positive)
        } else {
            Style::default().fg(theme.text)
        };
        Row::new(vec![
            Cell::from(row.date.as_str()),
            Cell::from(row.title.as_str()),
            Cell::from(row.category.as_str()),
            Cell::from(row.kind.as_str()).style(kind_style),
            Cell::from(Line::from(row.amount.as_str()).alignment(Alignment::Right)),
        ])
    });
    let widths = [
        Constraint::Length(10),
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Length(16),
    ];

    let widget = Table::new(rows, widths)
        .header(header)
        .block(panel.block())
        .row_highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");
    let mut state = TableState::default().with_selected(Some(table.selected_index()));
    frame.render_stateful_widget(widget, area, &mut state);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let context = match state.mode {
        Mode::Browse => hints::BROWSE,
        Mode::Form(_) => hints::FORM,
        Mode::ConfirmDelete { .. } => hints::CONFIRM,
    };

    let mut parts = hints_to_spans(context, theme);
    if state.mode == Mode::Browse {
        parts.push(hint_separator(theme));
        parts.extend(hints_to_spans(hints::QUIT, theme));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
