//! Field rendering utilities for forms

use crate::state::FieldKind;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Height of the input box for a multiline field, borders included
const MULTILINE_HEIGHT: u16 = 5;

/// Everything needed to draw one field
pub struct FieldView<'a> {
    pub label: &'a str,
    pub required: bool,
    pub kind: FieldKind,
    /// Text in the input box; for files, the path or the attachment summary
    pub value: &'a str,
    pub errors: &'a [String],
    /// Shown on the bottom border, e.g. the allowed choices
    pub hint: Option<String>,
    /// An attachment is being encoded
    pub loading: bool,
}

/// Rows a field occupies, including its error lines
pub fn field_height(view: &FieldView) -> u16 {
    let input = if view.kind.is_multiline() {
        MULTILINE_HEIGHT
    } else {
        3
    };
    input + view.errors.len() as u16
}

/// Draw a field box followed by its error messages
pub fn draw_field(frame: &mut Frame, area: Rect, view: &FieldView, is_active: bool) {
    let has_errors = !view.errors.is_empty();
    let border_style = match (is_active, has_errors) {
        (_, true) => Style::default().fg(Color::Red),
        (true, false) => Style::default().fg(Color::Cyan),
        (false, false) => Style::default().fg(Color::DarkGray),
    };
    let text_style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };

    let display_str = if view.loading {
        "loading attachment...".to_string()
    } else if view.value.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        view.value.to_string()
    };

    let cursor = if is_active && !view.loading { "▌" } else { "" };

    let mut lines: Vec<Line> = display_str
        .split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), text_style)))
        .collect();
    if let Some(last) = lines.last_mut() {
        last.spans
            .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
    }

    let marker = if view.required { " *" } else { "" };
    let mut block = Block::default()
        .title(format!(" {}{} ", view.label, marker))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(hint) = &view.hint {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {hint} "),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let input_height = area.height.saturating_sub(view.errors.len() as u16);
    let input_area = Rect {
        height: input_height,
        ..area
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        input_area,
    );

    for (offset, message) in view.errors.iter().enumerate() {
        let y = input_area.y + input_height + offset as u16;
        if y >= area.y + area.height {
            break;
        }
        let line_area = Rect {
            y,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("  ✗ {message}"),
                Style::default().fg(Color::Red),
            )),
            line_area,
        );
    }
}

/// Form-wide error shown above the fields
pub fn draw_page_error(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(
            "Error: ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(message, Style::default().fg(Color::Red)),
    ]))
    .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
