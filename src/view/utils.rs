//! Utility functions for rendering UI components

use ratatui::layout::Rect;

/// Minimum card width before the grid drops a column
pub const MIN_CARD_WIDTH: u16 = 28;
/// Border + title + two description lines + thumbnail + badge
pub const CARD_HEIGHT: u16 = 7;

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Word-wrap `text` into at most `max_lines` lines of `width` chars,
/// marking the last line with an ellipsis when text was cut off.
pub fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut overflow = false;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };

        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            if lines.len() == max_lines {
                overflow = true;
                break;
            }
        }
        if word_len > width {
            // Hard-break words longer than a line
            current = truncate_string(word, width);
        } else {
            current.push_str(word);
        }
    }

    if !overflow && !current.is_empty() {
        if lines.len() < max_lines {
            lines.push(current);
        } else {
            overflow = true;
        }
    }

    if overflow {
        if let Some(last) = lines.last_mut() {
            let trimmed: String = last.chars().take(width.saturating_sub(3)).collect();
            *last = format!("{}...", trimmed.trim_end());
        }
    }
    lines
}

/// Number of card columns that fit in `width`
pub fn grid_columns(width: u16) -> usize {
    (width / MIN_CARD_WIDTH).max(1) as usize
}

/// First grid row to draw so that `selected` stays visible
pub fn first_visible_row(selected: usize, columns: usize, visible_rows: usize) -> usize {
    let row = selected / columns.max(1);
    row.saturating_sub(visible_rows.saturating_sub(1))
}

/// Split `area` into a grid of card rectangles, row-major
pub fn card_cells(area: Rect, columns: usize, rows: usize) -> Vec<Rect> {
    let columns = columns.max(1) as u16;
    let card_width = area.width / columns;
    let mut cells = Vec::with_capacity(columns as usize * rows);
    for row in 0..rows as u16 {
        for col in 0..columns {
            let x = area.x + col * card_width;
            let width = if col == columns - 1 { area.width - col * card_width } else { card_width };
            cells.push(Rect {
                x,
                y: area.y + row * CARD_HEIGHT,
                width,
                height: CARD_HEIGHT,
            });
        }
    }
    cells
}

/// Centered popup rectangle clamped to `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
