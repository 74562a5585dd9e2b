// Participants widget: the pool, or the raw text while editing.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the participant panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if state.edit_mode {
        render_editor(frame, area, state);
        return;
    }

    let title = format!(" Participants ({}) ", state.pool.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(title);

    if state.pool.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                "  No participants.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "  e: type names, one per line",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "  o: import a CSV file",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_rows = (area.height as usize).saturating_sub(2);
    let entry_style = if state.is_drawing() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };

    let lines = visible_entries(&state.pool, visible_rows);
    let items: Vec<ListItem> = lines
        .into_iter()
        .map(|line| ListItem::new(Line::from(Span::styled(line, entry_style))))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_editor(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = state.edit_buffer.split('\n').count();
    let skip = total.saturating_sub(visible_rows);

    let mut lines: Vec<Line> = state
        .edit_buffer
        .split('\n')
        .skip(skip)
        .map(|l| Line::from(l.to_string()))
        .collect();
    if let Some(last) = lines.last_mut() {
        last.push_span(Span::styled(
            "_",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Editing participants (Esc when done) "),
    );
    frame.render_widget(paragraph, area);
}

/// Numbered entries that fit in `rows`, with an overflow marker as the last
/// row when some are hidden.
pub fn visible_entries(pool: &[String], rows: usize) -> Vec<String> {
    if rows == 0 {
        return Vec::new();
    }
    let numbered = |(i, name): (usize, &String)| format!("{:>3}. {}", i + 1, name);
    if pool.len() <= rows {
        return pool.iter().enumerate().map(numbered).collect();
    }
    let shown = rows - 1;
    let mut out: Vec<String> = pool.iter().enumerate().take(shown).map(numbered).collect();
    out.push(format!("     ... and {} more", pool.len() - shown));
    out
}
