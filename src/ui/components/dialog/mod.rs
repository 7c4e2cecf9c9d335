//! Dialog components for TUI

mod base;
mod receipt_dialog;

pub use receipt_dialog::render_receipt_dialog;
