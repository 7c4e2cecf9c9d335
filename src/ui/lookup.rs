//! Membership number prompt shown before a renewal

use super::forms::{draw_field, draw_page_error, FieldView};
use super::widgets::centered;
use crate::app::App;
use crate::state::FieldKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let gate = &app.state.renewal_gate;
    let area = centered(area, 56, 9);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Prompt
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Error
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new("Enter the membership number to renew")
            .style(Style::default().fg(Color::White)),
        chunks[0],
    );

    draw_field(
        frame,
        chunks[1],
        &FieldView {
            label: "Membership number",
            required: true,
            kind: FieldKind::Text,
            value: &gate.identifier,
            errors: &[],
            hint: None,
            loading: false,
        },
        true,
    );

    if gate.is_pending() {
        frame.render_widget(
            Paragraph::new("Looking up member...").style(Style::default().fg(Color::Yellow)),
            chunks[2],
        );
    } else if let Some(message) = gate.page_error() {
        draw_page_error(frame, chunks[2], message);
    }
}
