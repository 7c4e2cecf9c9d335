//! Layout components (header, status bar)

use crate::app::App;
use crate::platform::{COPY_SHORTCUT, NEXT_STEP_SHORTCUT, PREV_STEP_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::{NotificationLevel, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into a header line and the main content
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let conn_status = if app.state.registry_connected {
        Span::styled(" ● registry ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ registry ", Style::default().fg(Color::Red))
    };

    let title = match app.state.active.as_ref() {
        Some(active) if app.state.current_view == View::Wizard => {
            active.wizard.definition().title.clone()
        }
        _ => "Front desk".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Seva Desk ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(title, Style::default().fg(Color::White)),
        Span::raw("  "),
        conn_status,
    ]));
    frame.render_widget(header, area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![Span::raw(" ")];

    spans.push(Span::styled(
        view_hints(app),
        Style::default().fg(Color::Gray),
    ));

    if let Some(note) = &app.state.notification {
        let color = match note.level {
            NotificationLevel::Info => Color::Green,
            NotificationLevel::Error => Color::Red,
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(&note.message, Style::default().fg(color)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn view_hints(app: &App) -> String {
    match app.state.current_view {
        View::Menu => "j/k:nav  Enter:open  q:quit".to_string(),
        View::RenewalLookup if app.state.renewal_gate.is_pending() => "Esc:cancel".to_string(),
        View::RenewalLookup => "Enter:look up  Esc:back".to_string(),
        View::Wizard => match app.state.active.as_ref().map(|a| &a.wizard) {
            Some(w) if w.is_submitted() => format!("{COPY_SHORTCUT}:copy reference  Enter:done"),
            Some(w) if w.is_submitting() => "Saving...".to_string(),
            Some(w) if w.is_last_step() => {
                format!("Tab:next field  {PREV_STEP_SHORTCUT}:back  {SUBMIT_SHORTCUT}:submit  Esc:cancel")
            }
            _ => format!(
                "Tab:next field  {NEXT_STEP_SHORTCUT}:next  {PREV_STEP_SHORTCUT}:back  Alt+n:step n  Esc:cancel"
            ),
        },
    }
}
