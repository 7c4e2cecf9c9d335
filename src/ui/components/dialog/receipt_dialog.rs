//! Confirmation shown once a form has been saved

use super::base::{render_dialog, DialogConfig};
use crate::platform::COPY_SHORTCUT;
use crate::state::Receipt;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

pub fn render_receipt_dialog(frame: &mut Frame, area: Rect, title: &str, receipt: &Receipt) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let body = vec![
        Line::from(format!("{title} was saved.")),
        Line::from(vec![
            Span::raw("Reference: "),
            Span::styled(
                receipt.reference.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let hint = vec![
        Span::styled(COPY_SHORTCUT, key_style),
        Span::raw(" to copy, "),
        Span::styled("Enter", key_style),
        Span::raw(" to return to the menu"),
    ];

    render_dialog(
        frame,
        area,
        DialogConfig {
            title: "Saved",
            accent: Color::Green,
            body,
            hint: Some(hint),
            max_width: 64,
        },
    );
}
