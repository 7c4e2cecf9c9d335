//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod lookup;
mod menu;
mod widgets;
mod wizard;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (header_area, main_area) = layout::create_layout(area);

    layout::draw_header(frame, header_area, app);

    match &app.state.current_view {
        View::Menu => menu::draw(frame, main_area, app),
        View::RenewalLookup => lookup::draw(frame, main_area, app),
        View::Wizard => wizard::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);
}
