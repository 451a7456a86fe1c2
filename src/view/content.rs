//! Results area rendering (tabs with live counts, card grid)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, Category, ContentState, ResultItem, Tab, UiState};
use super::utils::{card_cells, clamp_lines, first_visible_row, grid_columns, truncate_string, CARD_HEIGHT};

/// Tab label with the service-reported total
pub fn tab_title(tab: Tab, content_state: &ContentState) -> String {
    let total = content_state.results_for(tab).total;
    match tab {
        Tab::Series => format!("Series ({})", total),
        Tab::Episodes => format!("Episodes ({})", total),
    }
}

pub fn render_results(frame: &mut Frame, area: Rect, ui_state: &UiState, content_state: &ContentState) {
    let is_focused = ui_state.active_section == ActiveSection::Results;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Card grid
        ])
        .split(area);

    let tabs_content: Vec<Span> = [Tab::Series, Tab::Episodes]
        .into_iter()
        .flat_map(|tab| {
            let style = if tab == content_state.tab {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            vec![
                Span::styled(format!(" {} ", tab_title(tab, content_state)), style),
                Span::raw("  "),
            ]
        })
        .collect();

    let mut tabs_block = Block::default()
        .borders(Borders::ALL)
        .title(" Results (←/→ to switch) ")
        .border_style(border_style);
    if content_state.is_loading {
        tabs_block = tabs_block.title_bottom(Line::from(" Loading... ").style(Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs_content)).block(tabs_block), chunks[0]);

    let grid_block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .border_style(border_style);
    let grid_area = grid_block.inner(chunks[1]);
    frame.render_widget(grid_block, chunks[1]);

    let items = &content_state.visible().items;
    if items.is_empty() {
        let empty_msg = if content_state.is_loading {
            "Loading..."
        } else {
            match content_state.tab {
                Tab::Series => "No series found",
                Tab::Episodes => "No episodes found",
            }
        };
        let empty = Paragraph::new(empty_msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, grid_area);
        return;
    }

    render_card_grid(frame, grid_area, items, content_state.selected_index(), is_focused);
}

fn render_card_grid(frame: &mut Frame, area: Rect, items: &[ResultItem], selected: usize, is_focused: bool) {
    let columns = grid_columns(area.width);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let first_row = first_visible_row(selected, columns, visible_rows);
    let cells = card_cells(area, columns, visible_rows);

    let start = first_row * columns;
    for (offset, cell) in cells.into_iter().enumerate() {
        let index = start + offset;
        let Some(item) = items.get(index) else { break };
        if cell.y + cell.height > area.y + area.height {
            break;
        }
        render_card(frame, cell, item, index == selected && is_focused);
    }
}

fn badge_style(category: Category) -> Style {
    match category {
        Category::Series => Style::default().fg(Color::Black).bg(Color::Magenta),
        Category::Episode => Style::default().fg(Color::Black).bg(Color::Cyan),
    }
}

fn render_card(frame: &mut Frame, area: Rect, item: &ResultItem, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let inner_width = area.width.saturating_sub(4) as usize;

    let title = if item.title.is_empty() { "(untitled)" } else { item.title.as_str() };
    let mut lines = vec![Line::from(Span::styled(
        truncate_string(title, inner_width),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))];

    let description = item.description.as_deref().unwrap_or("");
    let mut description_lines = clamp_lines(description, inner_width, 2);
    description_lines.resize(2, String::new());
    lines.extend(
        description_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Gray)))),
    );

    let thumbnail = match &item.thumbnail {
        Some(url) => truncate_string(&format!("🖼 {}", url), inner_width),
        None => "no thumbnail".to_string(),
    };
    lines.push(Line::from(Span::styled(thumbnail, Style::default().fg(Color::DarkGray))));

    let mut badge_line = vec![Span::styled(
        format!(" {} ", item.category.badge()),
        badge_style(item.category),
    )];
    if !item.tags.is_empty() {
        let room = inner_width.saturating_sub(item.category.badge().len() + 3);
        badge_line.push(Span::styled(
            format!(" {}", truncate_string(&item.tags.join(", "), room)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(badge_line));

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1))
            .border_style(border_style),
    );
    frame.render_widget(card, area);
}
