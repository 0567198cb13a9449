//! Rendering - form groups, submit button, results and model panel

use super::state::{FieldInput, FormField, FormState, GROUPS};
use chd_common::ui_colors::{
    RiskTone, COLOR_ACCENT, COLOR_ACCENT_DEEP, COLOR_INFO, COLOR_MUTED,
};
use chd_common::{Assessment, ModelMetadata, RECOMMENDATION};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Draw the whole screen
pub fn draw_ui(f: &mut Frame, state: &FormState, metadata: &ModelMetadata) {
    let size = f.size();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(8), // Form groups
            Constraint::Length(3), // Submit
            Constraint::Min(10),   // Results
            Constraint::Length(1), // Key hints
        ])
        .split(columns[0]);

    draw_header(f, rows[0]);
    draw_form(f, rows[1], state);
    draw_submit(f, rows[2], state);
    draw_results(f, rows[3], state);
    draw_hints(f, rows[4]);
    draw_model_panel(f, columns[1], metadata);

    if state.show_help {
        draw_help_overlay(f, size);
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " ❤️  CHD Risk Assessment ",
            Style::default()
                .fg(Color::White)
                .bg(rgb(COLOR_ACCENT_DEEP))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Estimate the risk of coronary heart disease"),
    ]);
    let header = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rgb(COLOR_ACCENT))),
    );
    f.render_widget(header, area);
}

fn draw_form(f: &mut Frame, area: Rect, state: &FormState) {
    let groups = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (i, (legend, names)) in GROUPS.iter().enumerate() {
        let mut lines = Vec::new();
        for name in names {
            let Some(index) = state.fields.iter().position(|field| field.spec.name == *name) else {
                continue;
            };
            let field = &state.fields[index];
            lines.extend(field_lines(field, state.focus == index));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" {} ", legend),
                Style::default()
                    .fg(rgb(COLOR_ACCENT_DEEP))
                    .add_modifier(Modifier::BOLD),
            ));
        f.render_widget(Paragraph::new(lines).block(block), groups[i]);
    }
}

fn field_lines(field: &FormField, focused: bool) -> Vec<Line<'static>> {
    let spec = field.spec;
    let caption = match spec.unit {
        Some(unit) => format!("{} ({})", spec.label, unit),
        None => spec.label.to_string(),
    };
    let label_style = if focused {
        Style::default()
            .fg(rgb(COLOR_ACCENT))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let value_style = if field.is_valid() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(rgb(RiskTone::Red.color()))
    };

    let value = match &field.input {
        FieldInput::Text(text) => {
            let cursor = if focused { "▏" } else { "" };
            format!("[{}{}]", text, cursor)
        }
        FieldInput::Slider { value, min, max } => {
            format!("◀ {} ▶  {}", value, slider_bar(*value, *min, *max, 12))
        }
        FieldInput::Toggle(_) => format!("◀ {} ▶", field.display_value()),
    };

    let marker = if focused { "› " } else { "  " };
    vec![
        Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(caption, label_style),
        ]),
        Line::from(vec![Span::raw("  "), Span::styled(value, value_style)]),
        Line::from(Span::styled(
            format!("  {}", spec.help),
            Style::default().fg(rgb(COLOR_MUTED)),
        )),
    ]
}

/// Text slider track, e.g. "──────●─────"
pub fn slider_bar(value: i64, min: i64, max: i64, width: usize) -> String {
    if max <= min || width == 0 {
        return String::new();
    }
    let pos = ((value - min) as f64 / (max - min) as f64 * (width - 1) as f64).round() as usize;
    (0..width)
        .map(|i| if i == pos.min(width - 1) { '●' } else { '─' })
        .collect()
}

fn draw_submit(f: &mut Frame, area: Rect, state: &FormState) {
    let enabled = state.submit_enabled();
    let style = match (enabled, state.submit_focused()) {
        (false, _) => Style::default().fg(rgb(COLOR_MUTED)),
        (true, true) => Style::default()
            .fg(Color::White)
            .bg(rgb(COLOR_ACCENT))
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(rgb(COLOR_ACCENT)),
    };
    let text = if enabled {
        "🔍 Assess risk"
    } else {
        "Assess risk (complete every field)"
    };
    let button = Paragraph::new(Line::from(Span::styled(text, style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    f.render_widget(button, area);
}

fn draw_results(f: &mut Frame, area: Rect, state: &FormState) {
    let block = Block::default().borders(Borders::ALL).title(" 📊 Results ");

    if let Some(error) = &state.error {
        let text = Paragraph::new(Span::styled(
            error.clone(),
            Style::default().fg(rgb(RiskTone::Red.color())),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(text, area);
        return;
    }

    let Some(assessment) = &state.assessment else {
        let hint = Paragraph::new(Span::styled(
            "Fill in the form and press Enter on the button to assess.",
            Style::default().fg(rgb(COLOR_MUTED)),
        ))
        .block(block);
        f.render_widget(hint, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Metrics
            Constraint::Length(1), // Gauge
            Constraint::Length(1),
            Constraint::Min(3), // Badge + recommendation
        ])
        .split(inner);

    draw_metrics(f, parts[0], assessment);

    let color = rgb(assessment.tone().color());
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(assessment.probability.clamp(0.0, 1.0))
        .label(Span::styled(
            format!("Probability of CHD: {}", assessment.percentage()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    f.render_widget(gauge, parts[1]);

    let diagnosis = assessment.diagnosis();
    let icon = if diagnosis.is_elevated() { "⚠️ " } else { "✅" };
    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", icon)),
            Span::styled(
                diagnosis.badge_text().to_uppercase(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(diagnosis.advisory()),
        Line::from(""),
        Line::from(vec![
            Span::styled("💡 Recommendation: ", Style::default().fg(rgb(COLOR_INFO))),
            Span::raw(RECOMMENDATION),
        ]),
    ];
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        parts[3],
    );
}

fn draw_metrics(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (column, rect) in assessment.metric_columns().iter().zip(halves.iter()) {
        let lines: Vec<Line> = column
            .iter()
            .map(|m| {
                Line::from(vec![
                    Span::styled(format!("{}: ", m.label), Style::default().fg(rgb(COLOR_MUTED))),
                    Span::styled(m.value.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines), *rect);
    }
}

fn draw_model_panel(f: &mut Frame, area: Rect, metadata: &ModelMetadata) {
    let muted = Style::default().fg(rgb(COLOR_MUTED));
    let mut lines = vec![
        Line::from(Span::styled("Algorithm", muted)),
        Line::from(metadata.algorithm.clone()),
        Line::from(""),
        Line::from(Span::styled("Dataset", muted)),
        Line::from(metadata.dataset.clone()),
    ];
    if let Some(trained_at) = &metadata.trained_at {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Trained", muted)));
        lines.push(Line::from(trained_at.clone()));
    }
    if let Some(notes) = &metadata.notes {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("⚠️  {}", notes),
            Style::default().fg(rgb(RiskTone::Red.color())),
        )));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" ℹ️  About the model "));
    f.render_widget(panel, area);
}

fn draw_hints(f: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Span::styled(
        " Tab/↑↓ move  ←/→ adjust  PgUp/PgDn ±10  Space toggle  Enter submit  F1 help  Esc quit",
        Style::default().fg(rgb(COLOR_MUTED)),
    ));
    f.render_widget(hints, area);
}

fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let width = area.width.min(60);
    let height = area.height.min(12);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    let text = vec![
        Line::from("Tab / ↓        next field"),
        Line::from("Shift+Tab / ↑  previous field"),
        Line::from("← / →          age ±1, toggle family history"),
        Line::from("PgUp / PgDn    age ±10"),
        Line::from("Space          toggle family history"),
        Line::from("Backspace      delete a digit"),
        Line::from("Enter          next field / submit"),
        Line::from("Esc, Ctrl+C    quit"),
    ];
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Help ")),
        popup,
    );
}
