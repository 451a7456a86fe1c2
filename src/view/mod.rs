//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared helpers (truncation, line clamping, grid geometry)
//! - `layout`: Search bar, filter inputs and status line
//! - `content`: Result tabs and card grid
//! - `overlays`: Modal overlays (detail dialog, help)

mod utils;
mod layout;
mod content;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ContentState, DetailState, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, ui_state: &UiState, content_state: &ContentState, detail: &DetailState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search + filters
                Constraint::Min(0),    // Tabs + card grid
                Constraint::Length(1), // Status line
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state);

        content::render_results(frame, chunks[1], ui_state, content_state);

        layout::render_status_bar(frame, chunks[2], ui_state, content_state);

        // Detail dialog overlay (if open)
        if detail.open {
            overlays::render_detail_dialog(frame, detail);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
