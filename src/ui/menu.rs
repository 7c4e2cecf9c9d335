//! Main menu

use super::widgets::{centered, render_scrollable_list};
use crate::app::App;
use crate::state::MenuItem;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.menu_index;
    let items: Vec<ListItem> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let style = if idx == selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if idx == selected { "▸ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(item.label(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" What would you like to do? ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    render_scrollable_list(frame, centered(area, 44, MenuItem::ALL.len() as u16 + 2), list, selected);
}
