//! Multi-step form view

use super::components::render_receipt_dialog;
use super::forms::{draw_field, draw_page_error, field_height, FieldView};
use crate::app::App;
use crate::state::{ActiveWizard, FieldValue};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepMark {
    Done,
    Current,
    Upcoming,
}

fn step_mark(index: usize, current: usize) -> StepMark {
    match index.cmp(&current) {
        std::cmp::Ordering::Less => StepMark::Done,
        std::cmp::Ordering::Equal => StepMark::Current,
        std::cmp::Ordering::Greater => StepMark::Upcoming,
    }
}

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(active) = app.state.active.as_ref() else {
        return;
    };
    let wizard = &active.wizard;

    let block = Block::default()
        .title(format!(" {} ", wizard.definition().title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let page_error_height = if wizard.page_error().is_some() { 2 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                 // Step header
            Constraint::Length(page_error_height), // Page error
            Constraint::Min(0),                    // Fields
        ])
        .split(inner);

    draw_step_header(frame, chunks[0], active);
    if let Some(message) = wizard.page_error() {
        draw_page_error(frame, chunks[1], message);
    }
    draw_fields(frame, chunks[2], active);

    if let Some(receipt) = wizard.receipt() {
        render_receipt_dialog(frame, area, &wizard.definition().title, receipt);
    }
}

fn draw_step_header(frame: &mut Frame, area: Rect, active: &ActiveWizard) {
    let wizard = &active.wizard;
    let current = wizard.current_step();
    let mut spans = Vec::new();

    for step in wizard.definition().steps.steps() {
        if !spans.is_empty() {
            spans.push(Span::styled("  ›  ", Style::default().fg(Color::DarkGray)));
        }
        let text = format!("{} {}", step.index + 1, step.label);
        let span = match step_mark(step.index, current) {
            StepMark::Done => Span::styled(
                format!("✓ {text}"),
                Style::default().fg(Color::Green),
            ),
            StepMark::Current => Span::styled(
                format!("● {text}"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            StepMark::Upcoming => Span::styled(
                format!("○ {text}"),
                Style::default().fg(Color::DarkGray),
            ),
        };
        spans.push(span);
    }

    let status = if wizard.is_submitting() {
        Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow)))
    } else {
        Line::from(Span::styled(
            format!("Step {} of {}", current + 1, wizard.step_count()),
            Style::default().fg(Color::Gray),
        ))
    };

    frame.render_widget(Paragraph::new(vec![Line::from(spans), status]), area);
}

/// Text shown in a field's input box
fn field_text(active: &ActiveWizard, name: &str) -> String {
    match active.wizard.value(name) {
        file @ FieldValue::File(_) => file.display_value(),
        _ => active.draft(name),
    }
}

fn draw_fields(frame: &mut Frame, area: Rect, active: &ActiveWizard) {
    let wizard = &active.wizard;
    let schema = &wizard.definition().schema;
    let names = wizard.definition().steps.fields_of(wizard.current_step());

    let texts: Vec<String> = names.iter().map(|n| field_text(active, n)).collect();
    let views: Vec<FieldView> = names
        .iter()
        .zip(texts.iter())
        .filter_map(|(name, text)| {
            let spec = schema.field(name)?;
            let hint = if spec.kind.is_file() && !matches!(wizard.value(name), FieldValue::File(_)) {
                Some("type a path, Enter to attach".to_string())
            } else {
                spec.choices().map(|c| c.join(" / "))
            };
            Some(FieldView {
                label: &spec.label,
                required: spec.is_required(),
                kind: spec.kind,
                value: text,
                errors: wizard.errors_for(name),
                hint,
                loading: wizard.is_encoding(name),
            })
        })
        .collect();

    let mut constraints: Vec<Constraint> = views
        .iter()
        .map(|v| Constraint::Length(field_height(v)))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, view) in views.iter().enumerate() {
        let is_active = idx == active.focused && !wizard.state().is_locked();
        draw_field(frame, chunks[idx], view, is_active);
    }
}
