//! Overlay rendering (detail dialog, help popup)

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::DetailState;
use super::utils::{centered_rect, truncate_string};

pub fn render_detail_dialog(frame: &mut Frame, detail: &DetailState) {
    let Some(item) = &detail.item else { return };
    let area = frame.area();

    let popup_width = (area.width * 4 / 5).max(40);
    let popup_height = (area.height * 4 / 5).max(10);
    let popup_area = centered_rect(area, popup_width, popup_height);

    // Clear the area behind the popup first
    frame.render_widget(Clear, popup_area);

    let title = if item.title.is_empty() { "(untitled)" } else { item.title.as_str() };
    let title = format!(
        " {} · {} (↑↓ scroll, Esc to close) ",
        item.category.badge(),
        truncate_string(title, popup_width.saturating_sub(40) as usize),
    );

    let mut ids = vec![
        Span::styled("id ", Style::default().fg(Color::DarkGray)),
        Span::styled(item.id.clone(), Style::default().fg(Color::Yellow)),
    ];
    if let Some(external_id) = &item.external_id {
        ids.push(Span::styled("  external ", Style::default().fg(Color::DarkGray)));
        ids.push(Span::styled(external_id.clone(), Style::default().fg(Color::Yellow)));
    }

    let mut lines = vec![Line::from(ids), Line::from("")];
    lines.extend(
        item.pretty_raw()
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White)))),
    );

    let body = Paragraph::new(lines)
        .scroll((detail.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title)
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(body, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = vec![
        ("", "── Search ──"),
        ("type", "Edit focused field"),
        ("Tab / Shift+Tab", "Cycle search, network, tags, results"),
        ("Enter / ↓", "Jump to results"),
        ("Esc", "Clear field / back to search"),
        ("Ctrl+E", "Switch engine (al / es)"),
        ("Ctrl+R", "Search again now"),
        ("", ""),
        ("", "── Results ──"),
        ("← / →, 1 / 2", "Switch Series / Episodes"),
        ("↑ / ↓", "Move selection"),
        ("PgUp / PgDn", "Move by page"),
        ("Enter", "Open details"),
        ("o", "Reopen last details"),
        ("", ""),
        ("", "── General ──"),
        ("F1 / ?", "Toggle this help"),
        ("Ctrl+Q / Q", "Quit"),
    ];

    let popup_height = keybindings.len() as u16 + 2;
    let popup_area = centered_rect(area, 64, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^40}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (F1 or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
