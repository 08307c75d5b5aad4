//! Rendering for the wizard screen: step indicators, progress bar,
//! the current step's fields with their validation feedback, and the
//! navigation footer.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::ui::dialogs;
use crate::wizard::navigator::IndicatorState;
use crate::wizard::validation::{counter_level, CounterLevel};
use crate::wizard::WizardScreen;

pub fn render(frame: &mut Frame, wizard: &mut WizardScreen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], wizard);
    render_progress(frame, chunks[1], wizard);
    render_body(frame, chunks[2], wizard);
    render_footer(frame, chunks[3], wizard);

    if let Some(alert) = wizard.alert() {
        dialogs::render_alert(frame, "Cannot submit", &alert.message());
    }
    if wizard.confirm_quit() {
        dialogs::render_quit_confirm(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, wizard: &WizardScreen) {
    let mut spans: Vec<Span> = Vec::new();
    for (idx, state) in wizard.navigator().indicator_states().iter().enumerate() {
        // skipped steps disappear from the sequence entirely
        if *state == IndicatorState::Hidden {
            continue;
        }
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        let title = wizard.form().steps[idx].title;
        let (symbol, style) = match state {
            IndicatorState::Active => (
                "●",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            IndicatorState::Completed => ("✓", Style::default().fg(Color::Green)),
            _ => ("○", Style::default().fg(Color::DarkGray)),
        };
        spans.push(Span::styled(format!("{symbol} {title}"), style));
    }

    let para = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(format!(" {} ", wizard.form().title))
            .borders(Borders::ALL),
    );
    frame.render_widget(para, area);
}

fn render_progress(frame: &mut Frame, area: Rect, wizard: &WizardScreen) {
    let percent = wizard.navigator().progress_percent();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(percent / 100.0)
        .label(format!(
            "Step {} of {}",
            wizard.navigator().current_logical(),
            wizard.navigator().total_logical()
        ));
    frame.render_widget(gauge, area);
}

/// One visual row of the step body
enum Row {
    Label(Line<'static>),
    Field { name: &'static str, height: u16 },
    Meta(Line<'static>),
}

fn render_body(frame: &mut Frame, area: Rect, wizard: &mut WizardScreen) {
    let user_type = wizard.user_type();
    let focused_name = wizard
        .current_step_fields()
        .get(wizard.focused_index())
        .copied();

    let specs: Vec<_> = wizard
        .form()
        .fields_of_step(wizard.navigator().current_physical())
        .cloned()
        .collect();

    let mut rows: Vec<Row> = Vec::new();
    for spec in &specs {
        let count = wizard.field(spec.name).map_or(0, |f| f.char_count());

        let mut label_spans = vec![Span::styled(
            spec.label_for(user_type).to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if spec.required {
            label_spans.push(Span::styled(" *", Style::default().fg(Color::Red)));
        }
        if spec.language_checked && spec.min_chars.is_none() {
            let color = match counter_level(count) {
                CounterLevel::Normal => Color::DarkGray,
                CounterLevel::Long => Color::Yellow,
                CounterLevel::VeryLong => Color::Red,
            };
            label_spans.push(Span::styled(
                format!("  {count} characters"),
                Style::default().fg(color),
            ));
        }
        rows.push(Row::Label(Line::from(label_spans)));

        let height = wizard.field(spec.name).map_or(3, |f| f.render_height());
        rows.push(Row::Field {
            name: spec.name,
            height,
        });

        if let Some(min) = spec.min_chars {
            let color = if count >= min { Color::Green } else { Color::Red };
            rows.push(Row::Meta(Line::from(Span::styled(
                format!("{count}/{min} characters minimum (mandatory)"),
                Style::default().fg(color),
            ))));
        }
        if spec.name == "salary_max" {
            if let Some(message) = wizard.validation().salary_message() {
                rows.push(Row::Meta(Line::from(Span::styled(
                    message.to_string(),
                    Style::default().fg(Color::Red),
                ))));
            }
        }
        if let Some(issues) = wizard.validation().language_issues(spec.name) {
            for issue in issues {
                rows.push(Row::Meta(Line::from(vec![
                    Span::styled(
                        format!("\"{}\"", issue.term),
                        Style::default().fg(Color::Red),
                    ),
                    Span::styled(
                        format!("  use: {}", issue.suggestion),
                        Style::default().fg(Color::Yellow),
                    ),
                ])));
            }
        }
    }

    if rows.is_empty() {
        // review step has no inputs
        let para = Paragraph::new("Review your details, then press Ctrl+S to submit.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, area.inner(ratatui::layout::Margin::new(2, 1)));
        return;
    }

    let constraints: Vec<Constraint> = rows
        .iter()
        .map(|row| match row {
            Row::Field { height, .. } => Constraint::Length(*height),
            _ => Constraint::Length(1),
        })
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area.inner(ratatui::layout::Margin::new(2, 0)));

    for (row, slot) in rows.into_iter().zip(slots.iter()) {
        match row {
            Row::Label(line) | Row::Meta(line) => {
                frame.render_widget(Paragraph::new(line), *slot);
            }
            Row::Field { name, .. } => {
                let focused = focused_name == Some(name);
                let marker = wizard.validation().marker(name);
                if let Some(field) = wizard.field_mut(name) {
                    field.render(frame, *slot, focused, marker);
                }
            }
        }
    }
}

fn render_footer(frame: &mut Frame, area: Rect, wizard: &WizardScreen) {
    let controls = wizard.navigator().controls();

    let mut spans: Vec<Span> = Vec::new();
    if controls.prev_visible {
        spans.push(Span::styled("Ctrl+← ", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw("Back   "));
    }
    if controls.next_visible {
        spans.push(Span::styled("Ctrl+→ ", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw("Next   "));
    }
    if controls.submit_visible {
        let (enabled, label) = wizard.validation().submit_label(wizard.form().intent);
        let style = if enabled {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        spans.push(Span::styled("Ctrl+S ", Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("   "));
    }
    spans.push(Span::styled("Tab ", Style::default().fg(Color::Cyan)));
    spans.push(Span::raw("Field   "));
    spans.push(Span::styled("Esc ", Style::default().fg(Color::Cyan)));
    spans.push(Span::raw("Quit"));

    let para = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(para, area);
}
