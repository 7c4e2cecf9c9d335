//! Reusable UI components

mod dialog;

pub use dialog::render_receipt_dialog;
