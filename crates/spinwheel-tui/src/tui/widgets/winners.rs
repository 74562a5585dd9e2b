// Winners widget: the result ledger in draw order.
//
// Each row: "#{n} {headline} | {candidate}" followed by the draw time.
// Rows from the most recent draw are highlighted; the selection cursor is
// shown reversed.

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use spinwheel_core::ledger::Winner;

use crate::tui::ViewState;

/// Render the winners list into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!(" Winners ({}) ", state.winners.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(title);

    if state.winners.is_empty() {
        let paragraph = Paragraph::new("  No winners yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = state.winners.len();
    let offset = scroll_offset(total, visible_rows, state.selected_winner);
    let latest_draw = state.winners.last().map(|w| w.draw_number);

    let items: Vec<ListItem> = state
        .winners
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows.max(1))
        .map(|(i, w)| {
            let mut style = if Some(w.draw_number) == latest_draw {
                Style::default().fg(Color::LightGreen)
            } else {
                Style::default().fg(Color::White)
            };
            if state.selected_winner == Some(i) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(Line::from(vec![
                Span::styled(format_winner(i, w), style),
                Span::styled(
                    format!("  {}", w.drawn_at.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Format one ledger row. `index` is zero-based.
pub fn format_winner(index: usize, winner: &Winner) -> String {
    format!("#{} {} | {}", index + 1, winner.headline(), winner.candidate)
}

/// First visible row: pinned to the newest rows, or scrolled to keep the
/// selection in view.
pub fn scroll_offset(total: usize, visible_rows: usize, selected: Option<usize>) -> usize {
    let max_offset = total.saturating_sub(visible_rows);
    match selected {
        Some(i) => i.saturating_sub(visible_rows.saturating_sub(1)).min(max_offset),
        None => max_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_winner_with_separator() {
        let w = Winner::new("A1-Jane-Acme".to_string(), 1, 1);
        assert_eq!(format_winner(0, &w), "#1 Jane | A1-Jane-Acme");
    }

    #[test]
    fn format_winner_plain_name() {
        let w = Winner::new("Budi".to_string(), 3, 2);
        assert_eq!(format_winner(4, &w), "#5 Budi | Budi");
    }

    #[test]
    fn scroll_offset_pins_newest() {
        assert_eq!(scroll_offset(20, 5, None), 15);
        assert_eq!(scroll_offset(3, 5, None), 0);
    }

    #[test]
    fn scroll_offset_follows_selection() {
        assert_eq!(scroll_offset(20, 5, Some(0)), 0);
        assert_eq!(scroll_offset(20, 5, Some(7)), 3);
        assert_eq!(scroll_offset(20, 5, Some(19)), 15);
    }

    #[test]
    fn render_does_not_panic_empty() {
        let backend = ratatui::backend::TestBackend::new(60, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_overflowing_list_with_selection() {
        let backend = ratatui::backend::TestBackend::new(60, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.winners = (0..12)
            .map(|i| Winner::new(format!("ID{i}-Name{i}-Org"), i / 3 + 1, 1))
            .collect();
        state.selected_winner = Some(2);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("#3 Name2"));
    }
}
