//! Layout rendering (search bar, filter inputs, status line)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, ContentState, UiState};

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let (text, text_style) = if value.is_empty() {
        (placeholder, Style::default().fg(Color::DarkGray))
    } else {
        (value, Style::default().fg(if focused { Color::Green } else { Color::White }))
    };

    let mut spans = vec![Span::styled(text.to_string(), text_style)];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Green)));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(focus_style(focused)),
    );
    frame.render_widget(input, area);
}

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),       // Search input
            Constraint::Length(16),    // Network / language
            Constraint::Length(28),    // Tags
            Constraint::Length(12),    // Engine
        ])
        .split(area);

    let section = ui_state.active_section;

    render_input(
        frame,
        chunks[0],
        " Search ",
        &ui_state.search_query,
        "Type to search...",
        section == ActiveSection::Search,
    );
    render_input(
        frame,
        chunks[1],
        " Network ",
        &ui_state.network_input,
        "any",
        section == ActiveSection::Network,
    );
    render_input(
        frame,
        chunks[2],
        " Tags ",
        &ui_state.tags_input,
        "comma,separated",
        section == ActiveSection::Tags,
    );

    let engine = Paragraph::new(ui_state.filters.engine.as_str())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Engine ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(engine, chunks[3]);
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, content_state: &ContentState) {
    let status = if content_state.is_loading {
        Span::styled(" Searching... ", Style::default().fg(Color::Yellow))
    } else if ui_state.debounced_query.trim().is_empty() {
        Span::styled(" Browsing all ", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            format!(" Results for \"{}\" ", ui_state.debounced_query.trim()),
            Style::default().fg(Color::DarkGray),
        )
    };

    let line = Line::from(vec![
        status,
        Span::raw(" "),
        Span::styled(
            "Tab: focus  ←/→: tabs  Enter: open  Ctrl+E: engine  F1: help  Ctrl+Q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
